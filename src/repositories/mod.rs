use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::ServiceError;
use crate::models::Shipment;

pub mod shipment_repository;

pub use shipment_repository::ShipmentRepository;

/// Persistence operations the shipment service relies on.
///
/// `find_by_code` yields `None` when nothing matches; callers decide whether that is an
/// error. `save` inserts or replaces the row keyed by `id` and returns what was stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Shipment>, ServiceError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Shipment>, ServiceError>;

    async fn find_by_code(&self, code: i64) -> Result<Option<Shipment>, ServiceError>;

    async fn find_by_freight(&self, freight: Decimal) -> Result<Vec<Shipment>, ServiceError>;

    async fn find_by_quantity(&self, quantity: i32) -> Result<Vec<Shipment>, ServiceError>;

    async fn find_by_delivered_date(
        &self,
        delivered_date: NaiveDate,
    ) -> Result<Vec<Shipment>, ServiceError>;

    async fn find_by_arrival_date(
        &self,
        arrival_date: NaiveDate,
    ) -> Result<Vec<Shipment>, ServiceError>;

    async fn save(&self, shipment: Shipment) -> Result<Shipment, ServiceError>;

    async fn delete(&self, shipment: Shipment) -> Result<(), ServiceError>;
}
