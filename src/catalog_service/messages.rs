use tokio::sync::oneshot;
use crate::catalog::{EditDraft, EditSession};
use crate::domain::{Product, ProductId, Rating};
use crate::error::CatalogError;

pub type ServiceResult<T> = Result<T, CatalogError>;
pub type ServiceResponse<T> = oneshot::Sender<ServiceResult<T>>;

/// Requests understood by the catalog service. Each carries its own
/// response channel.
#[derive(Debug)]
pub enum CatalogRequest {
    ListProducts {
        respond_to: ServiceResponse<Vec<Product>>,
    },
    GetProduct {
        id: ProductId,
        respond_to: ServiceResponse<Option<Product>>,
    },
    AddProduct {
        name: String,
        rating: Rating,
        respond_to: ServiceResponse<Product>,
    },
    DeleteProduct {
        id: ProductId,
        respond_to: ServiceResponse<bool>,
    },
    ToggleFavorite {
        id: ProductId,
        respond_to: ServiceResponse<Option<bool>>,
    },
    AddReview {
        id: ProductId,
        content: String,
        rating: Rating,
        respond_to: ServiceResponse<bool>,
    },
    BeginEdit {
        id: ProductId,
        respond_to: ServiceResponse<Option<EditDraft>>,
    },
    UpdateEditDraft {
        name: Option<String>,
        rating: Option<Rating>,
        respond_to: ServiceResponse<Option<EditDraft>>,
    },
    GetEditSession {
        respond_to: ServiceResponse<EditSession>,
    },
    SaveEdit {
        id: ProductId,
        name: String,
        rating: Rating,
        respond_to: ServiceResponse<Option<Product>>,
    },
    Shutdown,
}
