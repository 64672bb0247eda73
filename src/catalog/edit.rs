use crate::domain::{Product, ProductId, Rating};

/// In-progress values of the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub product_id: ProductId,
    pub name: String,
    pub rating: Rating,
}

/// Which product, if any, is being edited. Never persisted; a restart
/// always begins `Idle`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(EditDraft),
}

impl EditSession {
    /// Starts (or retargets) an edit, seeding the drafts from `product`.
    pub fn begin(&mut self, product: &Product) -> EditDraft {
        let draft = EditDraft {
            product_id: product.id,
            name: product.name.clone(),
            rating: product.rating.clone(),
        };
        *self = EditSession::Editing(draft.clone());
        draft
    }

    /// Replaces draft fields. Does nothing while idle.
    pub fn update(&mut self, name: Option<String>, rating: Option<Rating>) -> Option<&EditDraft> {
        match self {
            EditSession::Editing(draft) => {
                if let Some(name) = name {
                    draft.name = name;
                }
                if let Some(rating) = rating {
                    draft.rating = rating;
                }
                Some(draft)
            }
            EditSession::Idle => None,
        }
    }

    pub fn clear(&mut self) {
        *self = EditSession::Idle;
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        match self {
            EditSession::Editing(draft) => Some(draft),
            EditSession::Idle => None,
        }
    }

    pub fn is_editing(&self, id: ProductId) -> bool {
        self.draft().is_some_and(|draft| draft.product_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_seeds_drafts_and_retargets() {
        let widget = Product::new(ProductId(1), "Widget", Rating::Number(4));
        let gadget = Product::new(ProductId(2), "Gadget", Rating::NotANumber);

        let mut session = EditSession::default();
        assert_eq!(session.draft(), None);

        let draft = session.begin(&widget);
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.rating, Rating::Number(4));
        assert!(session.is_editing(ProductId(1)));

        session.begin(&gadget);
        assert!(session.is_editing(ProductId(2)));
        assert!(!session.is_editing(ProductId(1)));

        session.clear();
        assert_eq!(session, EditSession::Idle);
    }

    #[test]
    fn update_only_applies_while_editing() {
        let mut session = EditSession::Idle;
        assert!(session.update(Some("x".to_string()), None).is_none());

        session.begin(&Product::new(ProductId(1), "Widget", Rating::Number(4)));
        let draft = session.update(None, Some(Rating::from("2"))).cloned().unwrap();
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.rating, Rating::from("2"));
    }
}
