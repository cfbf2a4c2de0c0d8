//! Shipment service library
//!
//! Validation and uniqueness-checked CRUD over the `shipments` table: the entity, its
//! store contract and sea-orm implementation, the service, and the configuration, logging
//! and schema plumbing around them.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod errors;
pub mod migrator;
pub mod models;
pub mod repositories;
pub mod services;
pub mod validation;

pub use errors::{ServiceError, ValidationDetail};
pub use models::Shipment;
pub use repositories::{ShipmentRepository, ShipmentStore};
pub use services::shipments::ShipmentService;
pub use validation::{ConstraintValidator, ShipmentValidator, Violation};
