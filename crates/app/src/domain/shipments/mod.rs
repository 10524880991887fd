//! Shipments

pub mod errors;
pub mod lifecycle;
pub mod memory;
pub mod models;
mod repository;
pub mod service;
pub mod store;

pub use errors::{ShipmentStoreError, ShipmentsServiceError};
pub use memory::InMemoryShipmentStore;
pub use repository::PgShipmentStore;
pub use service::*;
pub use store::*;
