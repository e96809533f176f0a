//! Typed client handles over the generic resource client.

mod macros;
mod stock_client;

pub use stock_client::StockClient;
