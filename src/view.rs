//! Plain-text rendering of the catalog.

use std::fmt::Write;
use crate::catalog::EditSession;
use crate::domain::{Product, Rating};

pub const STAR: char = '★';
pub const FAVORITE: &str = "❤️";
pub const NOT_FAVORITE: &str = "🖤";

/// Star line for a rating.
pub fn stars(rating: &Rating) -> String {
    std::iter::repeat(STAR).take(rating.star_count()).collect()
}

/// Renders one product card. While the product is being edited its stars
/// follow the draft rating and the edit form is shown beneath them.
pub fn render_product(product: &Product, session: &EditSession) -> String {
    let mut out = String::new();
    let heart = if product.favorite { FAVORITE } else { NOT_FAVORITE };
    let _ = writeln!(out, "[{}] {} {}", product.id, product.name, heart);

    let draft = session.draft().filter(|_| session.is_editing(product.id));
    let shown_rating = draft.map_or(&product.rating, |draft| &draft.rating);
    let _ = writeln!(out, "  {}", stars(shown_rating));

    if let Some(draft) = draft {
        let _ = writeln!(out, "  editing: name={:?} rating={}", draft.name, draft.rating);
    }

    for review in &product.reviews {
        let _ = writeln!(out, "  - Rating: {}", review.rating);
        let _ = writeln!(out, "    {}", review.content);
    }
    out
}

/// Renders the whole catalog in order.
pub fn render_catalog(products: &[Product], session: &EditSession) -> String {
    if products.is_empty() {
        return "(no products)\n".to_string();
    }
    products
        .iter()
        .map(|product| render_product(product, session))
        .collect::<Vec<_>>()
        .join("\n")
}
