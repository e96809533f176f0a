//! # stock-keeper
//!
//! On-device stock list: products with a name, quantity and optional
//! description/code, kept in one actor and mirrored to a key-value store.
//!
//! ```no_run
//! use stock_keeper::{StockConfig, StockSystem, FileStorage, ProductPatch};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StockConfig::default();
//! let system = StockSystem::start(&config, FileStorage::new(&config.data_dir)).await;
//! let stock = system.client();
//!
//! let widget = stock.add_product("Widget", 10, None, Some("W-1")).await?;
//! stock.update_product(widget.id.clone(), ProductPatch::amount(7)).await?;
//! stock.remove_product(widget.id).await?;
//!
//! drop(stock);
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod config;
pub mod domain;
pub mod product_actor;
pub mod storage;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, StockSystem};
pub use clients::StockClient;
pub use config::{ConfigError, StockConfig, DEFAULT_STORAGE_KEY};
pub use domain::{parse_amount, validate_new_product, Product, ProductCreate, ProductPatch, ValidationError};
pub use product_actor::StockError;
pub use storage::{FileStorage, InMemoryStorage, KeyValueStorage, StorageError};
