//! The catalog actor: a single task that owns the catalog and the edit
//! session, plus the client handle used to talk to it.

pub mod client;
pub mod messages;
pub mod service;

pub use client::*;
pub use service::*;
