//! The ordered product list and the rules for changing it.
//!
//! `Catalog` holds no I/O; the service persists it after every change.

pub mod edit;
pub mod ids;

pub use edit::*;
pub use ids::*;

use crate::domain::{Product, ProductId, Rating, Review};

/// Ordered sequence of products. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    fn get_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| product.id == id)
    }

    /// Largest id present, used to seed id generation after a reload.
    pub fn max_id(&self) -> Option<ProductId> {
        self.products.iter().map(|product| product.id).max()
    }

    /// Appends a product to the end of the catalog.
    pub fn add_product(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Removes every product with the given id. Returns whether anything
    /// was removed; a missing id is not an error.
    pub fn delete_product(&mut self, id: ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|product| product.id != id);
        self.products.len() != before
    }

    /// Flips `favorite` and returns the new value, or `None` if no product
    /// matches.
    pub fn toggle_favorite(&mut self, id: ProductId) -> Option<bool> {
        let product = self.get_mut(id)?;
        product.favorite = !product.favorite;
        Some(product.favorite)
    }

    /// Appends a review to the matching product.
    pub fn add_review(&mut self, id: ProductId, review: Review) -> bool {
        match self.get_mut(id) {
            Some(product) => {
                product.reviews.push(review);
                true
            }
            None => false,
        }
    }

    /// Overwrites name and rating of the matching product, leaving its
    /// favorite flag and reviews untouched.
    pub fn update_product(&mut self, id: ProductId, name: String, rating: Rating) -> Option<&Product> {
        let product = self.get_mut(id)?;
        product.name = name;
        product.rating = rating;
        Some(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.add_product(Product::new(ProductId(1), "Widget", Rating::Number(4)));
        catalog.add_product(Product::new(ProductId(2), "Gadget", Rating::Number(2)));
        catalog
    }

    #[test]
    fn add_appends_in_order() {
        let catalog = sample();
        let names: Vec<&str> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gadget"]);
        assert_eq!(catalog.max_id(), Some(ProductId(2)));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut catalog = sample();
        assert!(catalog.delete_product(ProductId(1)));
        let after_first = catalog.clone();

        assert!(!catalog.delete_product(ProductId(1)));
        assert_eq!(catalog, after_first);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn toggle_favorite_is_involutive() {
        let mut catalog = sample();
        assert_eq!(catalog.toggle_favorite(ProductId(2)), Some(true));
        assert_eq!(catalog.toggle_favorite(ProductId(2)), Some(false));
        assert_eq!(catalog, sample());
        assert_eq!(catalog.toggle_favorite(ProductId(99)), None);
    }

    #[test]
    fn reviews_are_append_only() {
        let mut catalog = sample();
        assert!(catalog.add_review(ProductId(1), Review::new("first", Rating::from("3"))));
        assert!(catalog.add_review(ProductId(1), Review::new("second", Rating::from("5"))));

        let reviews = &catalog.get(ProductId(1)).unwrap().reviews;
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].content, "first");
        assert_eq!(reviews[1].content, "second");

        assert!(!catalog.add_review(ProductId(99), Review::new("lost", Rating::from("1"))));
    }

    #[test]
    fn update_touches_only_the_matching_product() {
        let mut catalog = sample();
        catalog.toggle_favorite(ProductId(2));
        catalog.add_review(ProductId(2), Review::new("ok", Rating::from("3")));
        let untouched = catalog.get(ProductId(2)).cloned().unwrap();

        let updated = catalog
            .update_product(ProductId(1), "Widget Pro".to_string(), Rating::from("5"))
            .cloned()
            .unwrap();
        assert_eq!(updated.name, "Widget Pro");
        assert_eq!(updated.rating, Rating::from("5"));
        assert!(!updated.favorite);
        assert_eq!(catalog.get(ProductId(2)), Some(&untouched));

        assert!(catalog.update_product(ProductId(99), "x".to_string(), Rating::Number(1)).is_none());
    }
}
