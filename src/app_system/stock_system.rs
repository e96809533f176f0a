use tracing::{error, info, warn};

use crate::actor_framework::ResourceActor;
use crate::clients::StockClient;
use crate::config::StockConfig;
use crate::domain::Product;
use crate::product_actor::{new_product_id, StockError};
use crate::storage::KeyValueStorage;

/// Owns the stock actor for the life of the process.
///
/// Built once at startup; consumers get a [`StockClient`] clone instead of
/// reaching for shared global state.
pub struct StockSystem {
    pub stock_client: StockClient,
    handle: tokio::task::JoinHandle<()>,
}

impl StockSystem {
    /// Spawns the actor without loading anything from storage.
    ///
    /// Mutations fail with [`StockError::NotHydrated`] until
    /// [`StockClient::hydrate`] has run; [`StockSystem::start`] does both.
    pub fn new<S: KeyValueStorage>(config: &StockConfig, storage: S) -> Self {
        let (actor, resource_client) = ResourceActor::<Product, S>::new(
            config.mailbox_capacity,
            storage,
            config.storage_key.clone(),
            new_product_id,
        );
        let handle = tokio::spawn(actor.run());

        Self {
            stock_client: StockClient::new(resource_client),
            handle,
        }
    }

    /// Spawns the actor and hydrates it before handing out the client.
    ///
    /// Unreadable or malformed stored data is logged and the system starts
    /// with empty stock.
    pub async fn start<S: KeyValueStorage>(config: &StockConfig, storage: S) -> Self {
        info!(key = %config.storage_key, "Starting stock system");
        let system = Self::new(config, storage);

        match system.stock_client.hydrate().await {
            Ok(count) => info!(count, "Stock loaded"),
            Err(e @ (StockError::MalformedData(_) | StockError::Persistence(_))) => {
                warn!(error = %e, "Could not load stored stock, starting empty")
            }
            Err(e) => error!(error = %e, "Stock hydration failed"),
        }

        system
    }

    pub fn client(&self) -> StockClient {
        self.stock_client.clone()
    }

    /// Drops this handle's client and waits for the actor to drain.
    ///
    /// The actor stops once every outstanding [`StockClient`] clone is gone.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down stock system...");
        drop(self.stock_client);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }

        info!("Stock system shutdown complete.");
        Ok(())
    }
}
