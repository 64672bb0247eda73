use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};
use crate::catalog::{EditDraft, EditSession};
use crate::domain::{Product, ProductId, Rating};
use crate::error::CatalogError;
use super::messages::CatalogRequest;

/// Generates a client method that sends a request variant and awaits its
/// oneshot response. Parameter names must match the variant's field names.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, CatalogError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| CatalogError::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| CatalogError::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

/// Cloneable handle to the catalog service.
#[derive(Clone)]
pub struct CatalogClient {
    sender: mpsc::Sender<CatalogRequest>,
}

impl CatalogClient {
    pub fn new(sender: mpsc::Sender<CatalogRequest>) -> Self {
        Self { sender }
    }

    /// Asks the service to stop after the requests already queued.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CatalogError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CatalogRequest::Shutdown)
            .await
            .map_err(|_| CatalogError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(CatalogClient => fn list_products() -> Vec<Product> as CatalogRequest::ListProducts);
client_method!(CatalogClient => fn get_product(id: ProductId) -> Option<Product> as CatalogRequest::GetProduct);
client_method!(CatalogClient => fn add_product(name: String, rating: Rating) -> Product as CatalogRequest::AddProduct);
client_method!(CatalogClient => fn delete_product(id: ProductId) -> bool as CatalogRequest::DeleteProduct);
client_method!(CatalogClient => fn toggle_favorite(id: ProductId) -> Option<bool> as CatalogRequest::ToggleFavorite);
client_method!(CatalogClient => fn add_review(id: ProductId, content: String, rating: Rating) -> bool as CatalogRequest::AddReview);
client_method!(CatalogClient => fn begin_edit(id: ProductId) -> Option<EditDraft> as CatalogRequest::BeginEdit);
client_method!(CatalogClient => fn update_edit_draft(name: Option<String>, rating: Option<Rating>) -> Option<EditDraft> as CatalogRequest::UpdateEditDraft);
client_method!(CatalogClient => fn get_edit_session() -> EditSession as CatalogRequest::GetEditSession);
client_method!(CatalogClient => fn save_edit(id: ProductId, name: String, rating: Rating) -> Option<Product> as CatalogRequest::SaveEdit);
