use std::fmt;
use serde::{Deserialize, Serialize};
use super::rating::Rating;

/// Product identifier: the creation timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ProductId)
    }
}

/// A rated free-text comment. Reviews have no identity of their own and only
/// exist inside the product they were written for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub content: String,
    pub rating: Rating,
}

impl Review {
    pub fn new(content: impl Into<String>, rating: Rating) -> Self {
        Self {
            content: content.into(),
            rating,
        }
    }
}

/// A catalog entry. Field order matches the persisted JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub rating: Rating,
    pub favorite: bool,
    pub reviews: Vec<Review>,
}

impl Product {
    /// Creates an unfavorited product with no reviews.
    pub fn new(id: ProductId, name: impl Into<String>, rating: Rating) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            favorite: false,
            reviews: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_serializes_with_stored_field_layout() {
        let mut product = Product::new(ProductId(1700000000000), "Widget", Rating::Number(4));
        product.reviews.push(Review::new("Great", Rating::from("5")));

        let json = serde_json::to_string(&product).unwrap();
        assert_eq!(
            json,
            r#"{"id":1700000000000,"name":"Widget","rating":4,"favorite":false,"reviews":[{"content":"Great","rating":"5"}]}"#
        );
    }

    #[test]
    fn nan_rating_persists_as_null() {
        let product = Product::new(ProductId(7), "Gadget", Rating::NotANumber);
        let json = serde_json::to_value(&product).unwrap();
        assert!(json["rating"].is_null());

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn product_id_parses_from_user_input() {
        assert_eq!(" 42 ".parse::<ProductId>().unwrap(), ProductId(42));
        assert!("forty-two".parse::<ProductId>().is_err());
    }
}
