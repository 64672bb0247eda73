//! Catalog domain types: products, reviews and ratings.

pub mod product;
pub mod rating;

pub use product::*;
pub use rating::*;
