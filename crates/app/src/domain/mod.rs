//! Shipment Domain Concerns

pub mod shipments;
pub mod tenants;
