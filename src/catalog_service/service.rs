use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use crate::catalog::{Catalog, Clock, EditDraft, EditSession, IdGenerator};
use crate::domain::{Product, ProductId, Rating, RatingPolicy, Review};
use crate::error::CatalogError;
use crate::storage::{load_catalog, save_catalog, KeyValueStore, DEFAULT_STORAGE_KEY};
use super::client::CatalogClient;
use super::messages::{CatalogRequest, ServiceResponse, ServiceResult};

/// Knobs the service is started with.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub storage_key: String,
    pub rating_policy: RatingPolicy,
    pub channel_capacity: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            rating_policy: RatingPolicy::default(),
            channel_capacity: 32,
        }
    }
}

/// Owner of the catalog. All reads and writes go through its mailbox, and
/// each request finishes its mutate-then-persist sequence before the next
/// one is taken, so there is exactly one writer.
pub struct CatalogService {
    receiver: mpsc::Receiver<CatalogRequest>,
    catalog: Catalog,
    session: EditSession,
    ids: IdGenerator,
    store: Box<dyn KeyValueStore>,
    storage_key: String,
    policy: RatingPolicy,
}

impl CatalogService {
    /// Loads the stored catalog (empty on any failure), writes it straight
    /// back, and returns the service with a client connected to it.
    #[instrument(name = "catalog_init", skip(store, clock), fields(storage_key = %settings.storage_key))]
    pub async fn initialize(
        store: Box<dyn KeyValueStore>,
        settings: CatalogSettings,
        clock: Clock,
    ) -> (Self, CatalogClient) {
        let catalog = load_catalog(store.as_ref(), &settings.storage_key).await;

        let mut ids = IdGenerator::new(clock);
        if let Some(max_id) = catalog.max_id() {
            ids.observe(max_id);
        }

        if let Err(e) = save_catalog(store.as_ref(), &settings.storage_key, &catalog).await {
            warn!(error = %e, "Initial catalog write failed");
        }
        if catalog.is_empty() {
            debug!("No stored products");
        }
        info!(product_count = catalog.len(), "Catalog initialized");

        let (sender, receiver) = mpsc::channel(settings.channel_capacity.max(1));
        let service = Self {
            receiver,
            catalog,
            session: EditSession::Idle,
            ids,
            store,
            storage_key: settings.storage_key,
            policy: settings.rating_policy,
        };
        (service, CatalogClient::new(sender))
    }

    #[instrument(name = "catalog_service", skip(self))]
    pub async fn run(mut self) {
        info!("CatalogService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CatalogRequest::ListProducts { respond_to } => {
                    self.handle_list_products(respond_to);
                }
                CatalogRequest::GetProduct { id, respond_to } => {
                    self.handle_get_product(id, respond_to);
                }
                CatalogRequest::AddProduct { name, rating, respond_to } => {
                    self.handle_add_product(name, rating, respond_to).await;
                }
                CatalogRequest::DeleteProduct { id, respond_to } => {
                    self.handle_delete_product(id, respond_to).await;
                }
                CatalogRequest::ToggleFavorite { id, respond_to } => {
                    self.handle_toggle_favorite(id, respond_to).await;
                }
                CatalogRequest::AddReview { id, content, rating, respond_to } => {
                    self.handle_add_review(id, content, rating, respond_to).await;
                }
                CatalogRequest::BeginEdit { id, respond_to } => {
                    self.handle_begin_edit(id, respond_to);
                }
                CatalogRequest::UpdateEditDraft { name, rating, respond_to } => {
                    let _ = respond_to.send(Ok(self.session.update(name, rating).cloned()));
                }
                CatalogRequest::GetEditSession { respond_to } => {
                    let _ = respond_to.send(Ok(self.session.clone()));
                }
                CatalogRequest::SaveEdit { id, name, rating, respond_to } => {
                    self.handle_save_edit(id, name, rating, respond_to).await;
                }
                CatalogRequest::Shutdown => {
                    info!("CatalogService shutting down");
                    break;
                }
            }
        }

        info!("CatalogService stopped");
    }

    /// Writes the full catalog. The in-memory change stands even if this
    /// fails; the error goes back to the caller.
    async fn persist(&self) -> ServiceResult<()> {
        save_catalog(self.store.as_ref(), &self.storage_key, &self.catalog)
            .await
            .map_err(|e| {
                error!(error = %e, "Catalog write failed");
                CatalogError::from(e)
            })
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_products(&self, respond_to: ServiceResponse<Vec<Product>>) {
        debug!(product_count = self.catalog.len(), "Processing list_products request");
        let _ = respond_to.send(Ok(self.catalog.products().to_vec()));
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_get_product(&self, id: ProductId, respond_to: ServiceResponse<Option<Product>>) {
        debug!("Processing get_product request");
        let _ = respond_to.send(Ok(self.catalog.get(id).cloned()));
    }

    #[instrument(fields(product_name = %name, rating = %rating), skip(self, name, rating, respond_to))]
    async fn handle_add_product(
        &mut self,
        name: String,
        rating: Rating,
        respond_to: ServiceResponse<Product>,
    ) {
        debug!("Processing add_product request");

        let admitted = self
            .policy
            .admit_name(name)
            .and_then(|name| Ok((name, self.policy.admit_product_rating(rating)?)));
        let (name, rating) = match admitted {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "Product rejected");
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        let Some(id) = self.ids.next_id() else {
            let e = CatalogError::IdsExhausted(self.catalog.max_id().map_or(i64::MAX, |id| id.0));
            warn!(error = %e, "Product rejected");
            let _ = respond_to.send(Err(e));
            return;
        };

        let product = Product::new(id, name, rating);
        self.catalog.add_product(product.clone());
        info!(product_id = %product.id, "Product added");

        let result = self.persist().await.map(|_| product);
        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    async fn handle_delete_product(&mut self, id: ProductId, respond_to: ServiceResponse<bool>) {
        debug!("Processing delete_product request");

        let removed = self.catalog.delete_product(id);
        if removed {
            info!("Product deleted");
        } else {
            debug!("No product to delete");
        }

        let result = self.persist().await.map(|_| removed);
        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    async fn handle_toggle_favorite(&mut self, id: ProductId, respond_to: ServiceResponse<Option<bool>>) {
        debug!("Processing toggle_favorite request");

        let favorite = self.catalog.toggle_favorite(id);
        match favorite {
            Some(favorite) => info!(favorite, "Favorite toggled"),
            None => debug!("No product to toggle"),
        }

        let result = self.persist().await.map(|_| favorite);
        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id, rating = %rating), skip(self, content, rating, respond_to))]
    async fn handle_add_review(
        &mut self,
        id: ProductId,
        content: String,
        rating: Rating,
        respond_to: ServiceResponse<bool>,
    ) {
        debug!("Processing add_review request");

        let rating = match self.policy.admit_raw_rating(rating) {
            Ok(rating) => rating,
            Err(e) => {
                warn!(error = %e, "Review rejected");
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        let added = self.catalog.add_review(id, Review::new(content, rating));
        if added {
            info!("Review added");
        } else {
            debug!("No product to review");
        }

        let result = self.persist().await.map(|_| added);
        let _ = respond_to.send(result);
    }

    /// Unknown ids leave the session as it was.
    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_begin_edit(&mut self, id: ProductId, respond_to: ServiceResponse<Option<EditDraft>>) {
        debug!("Processing begin_edit request");

        let draft = match self.catalog.get(id) {
            Some(product) => Some(self.session.begin(product)),
            None => {
                warn!("Cannot edit missing product");
                None
            }
        };

        let _ = respond_to.send(Ok(draft));
    }

    #[instrument(fields(product_id = %id, product_name = %name), skip(self, name, rating, respond_to))]
    async fn handle_save_edit(
        &mut self,
        id: ProductId,
        name: String,
        rating: Rating,
        respond_to: ServiceResponse<Option<Product>>,
    ) {
        debug!("Processing save_edit request");

        let admitted = self
            .policy
            .admit_name(name)
            .and_then(|name| Ok((name, self.policy.admit_raw_rating(rating)?)));
        let (name, rating) = match admitted {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "Edit rejected");
                let _ = respond_to.send(Err(e));
                return;
            }
        };

        let updated = self.catalog.update_product(id, name, rating).cloned();
        self.session.clear();
        match &updated {
            Some(_) => info!("Product updated"),
            None => debug!("No product to update"),
        }

        let result = self.persist().await.map(|_| updated);
        let _ = respond_to.send(result);
    }
}
