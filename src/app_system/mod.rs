//! System startup, tracing and shutdown.

pub mod stock_system;
pub mod telemetry;

pub use stock_system::*;
pub use telemetry::*;
