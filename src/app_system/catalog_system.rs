use tracing::{debug, error, info, instrument};
use crate::catalog::{system_clock, Clock};
use crate::catalog_service::{CatalogClient, CatalogService, CatalogSettings};
use crate::config::AppConfig;
use crate::error::CatalogError;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

/// Starts the catalog service, hands out its client, and shuts it down.
pub struct CatalogSystem {
    pub catalog_client: CatalogClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CatalogSystem {
    /// Starts against the file store described by `config`.
    #[instrument(name = "catalog_system", skip(config), fields(data_dir = %config.storage.data_dir.display()))]
    pub async fn start(config: &AppConfig) -> Result<Self, CatalogError> {
        let store = FileStore::open(&config.storage.data_dir).await?;
        debug!(dir = %store.dir().display(), "Catalog file store opened");
        Ok(Self::with_store(Box::new(store), config.catalog_settings(), system_clock()).await)
    }

    /// Starts against a throwaway in-memory store.
    pub async fn start_ephemeral(config: &AppConfig) -> Self {
        Self::with_store(Box::new(MemoryStore::new()), config.catalog_settings(), system_clock()).await
    }

    pub async fn with_store(
        store: Box<dyn KeyValueStore>,
        settings: CatalogSettings,
        clock: Clock,
    ) -> Self {
        info!("Starting catalog system");

        let (service, catalog_client) = CatalogService::initialize(store, settings, clock).await;
        let handles = vec![tokio::spawn(service.run())];

        info!("Catalog system started successfully");
        Self { catalog_client, handles }
    }

    /// Stops the service after it drains queued requests and waits for the
    /// task to finish.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog system");

        let _ = self.catalog_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
                return Err(format!("Service task failed: {:?}", e));
            }
        }

        info!("Catalog system shutdown complete");
        Ok(())
    }
}
