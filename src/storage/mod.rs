//! Key-value persistence for the catalog.
//!
//! The whole catalog is stored as one JSON array under a single key and
//! rewritten in full after every change.

mod file_store;
mod memory_store;

pub use file_store::*;
pub use memory_store::*;

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use crate::catalog::Catalog;
use crate::domain::Product;
use crate::error::StorageError;

/// Namespace key the catalog lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "products";

/// A string-to-string store with atomic single-key writes.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keys double as file names, so only a conservative alphabet is allowed.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Reads the catalog stored under `key`.
///
/// Never fails: a missing key, an unreadable store, or a value that is not
/// a JSON array of products all yield an empty catalog.
#[instrument(skip(store))]
pub async fn load_catalog(store: &dyn KeyValueStore, key: &str) -> Catalog {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored catalog, starting empty");
            return Catalog::default();
        }
        Err(e) => {
            warn!(error = %e, "Could not read stored catalog, starting empty");
            return Catalog::default();
        }
    };

    if raw.trim().is_empty() {
        return Catalog::default();
    }

    match serde_json::from_str::<Vec<Product>>(&raw) {
        Ok(products) => {
            debug!(product_count = products.len(), "Loaded stored catalog");
            Catalog::new(products)
        }
        Err(e) => {
            warn!(error = %e, "Stored catalog is malformed, starting empty");
            Catalog::default()
        }
    }
}

/// Serializes the full catalog and writes it under `key`.
#[instrument(skip(store, catalog), fields(product_count = catalog.len()))]
pub async fn save_catalog(
    store: &dyn KeyValueStore,
    key: &str,
    catalog: &Catalog,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(catalog.products())?;
    store.set(key, &json).await?;
    debug!("Catalog persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProductId, Rating, Review};

    #[tokio::test]
    async fn missing_key_loads_empty() {
        let store = MemoryStore::new();
        assert!(load_catalog(&store, DEFAULT_STORAGE_KEY).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_or_wrong_shape_loads_empty() {
        let store = MemoryStore::new();
        for raw in ["{not json", "{}", "null", "", "[{\"id\":\"x\"}]", "[{\"id\":1,\"name\":\"a\"}]"] {
            store.set(DEFAULT_STORAGE_KEY, raw).await.unwrap();
            assert!(
                load_catalog(&store, DEFAULT_STORAGE_KEY).await.is_empty(),
                "expected empty catalog for {:?}",
                raw
            );
        }
    }

    #[tokio::test]
    async fn round_trip_preserves_every_field() {
        let store = MemoryStore::new();
        let mut catalog = Catalog::default();
        let mut widget = Product::new(ProductId(1), "Widget", Rating::Number(4));
        widget.favorite = true;
        widget.reviews.push(Review::new("Great", Rating::from("5")));
        catalog.add_product(widget);
        catalog.add_product(Product::new(ProductId(2), "Gadget", Rating::NotANumber));

        save_catalog(&store, DEFAULT_STORAGE_KEY, &catalog).await.unwrap();
        let reloaded = load_catalog(&store, DEFAULT_STORAGE_KEY).await;
        assert_eq!(reloaded, catalog);
    }

    #[tokio::test]
    async fn reads_catalogs_with_mixed_rating_shapes() {
        let store = MemoryStore::new();
        let raw = r#"[{"id":1690000000000,"name":"Lamp","rating":3,"favorite":true,"reviews":[{"content":"Bright","rating":"4"}]},{"id":1690000000001,"name":"","rating":null,"favorite":false,"reviews":[]}]"#;
        store.set("products", raw).await.unwrap();

        let catalog = load_catalog(&store, "products").await;
        assert_eq!(catalog.len(), 2);
        let lamp = catalog.get(ProductId(1690000000000)).unwrap();
        assert_eq!(lamp.reviews[0].rating, Rating::from("4"));
        assert_eq!(catalog.products()[1].rating, Rating::NotANumber);
    }

    #[test]
    fn keys_are_restricted_to_file_safe_characters() {
        assert!(validate_key("products").is_ok());
        assert!(validate_key("shop-2_items").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc").is_err());
        assert!(validate_key("a b").is_err());
    }
}
