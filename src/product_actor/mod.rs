//! Product-specific wiring for the resource actor.

pub mod entity;
pub mod error;

pub use entity::new_product_id;
pub use error::*;
