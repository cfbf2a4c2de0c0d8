use chrono::NaiveDate;
use metrics::counter;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    config::ShipmentsConfig,
    errors::ServiceError,
    models::Shipment,
    repositories::ShipmentStore,
    validation::ShipmentValidator,
};

const ENTITY: &str = "Shipment";
const DUPLICATE_ID: &str = "A shipment with the same id already exists";
const DUPLICATE_CODE: &str = "A shipment with the same code already exists";

/// Service for managing shipments
///
/// Every write runs its checks and the store call back to back with no transaction around
/// them. Two concurrent creates carrying the same code can both pass the uniqueness check.
#[derive(Clone)]
pub struct ShipmentService {
    store: Arc<dyn ShipmentStore>,
    validator: Arc<dyn ShipmentValidator>,
    config: ShipmentsConfig,
}

impl ShipmentService {
    /// Creates a new shipment service instance
    pub fn new(store: Arc<dyn ShipmentStore>, validator: Arc<dyn ShipmentValidator>) -> Self {
        Self {
            store,
            validator,
            config: ShipmentsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ShipmentsConfig) -> Self {
        self.config = config;
        self
    }

    /// Lists every stored shipment in the store's natural order
    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Shipment>, ServiceError> {
        self.store.find_all().await
    }

    /// Gets a shipment by ID, failing with `NotFound` when absent
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Shipment, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Gets a shipment by code.
    ///
    /// Unlike [`get_by_id`](Self::get_by_id), a missing code is not an error: the result is
    /// simply `None`.
    #[instrument(skip(self))]
    pub async fn get_by_code(&self, code: i64) -> Result<Option<Shipment>, ServiceError> {
        self.store.find_by_code(code).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_freight(&self, freight: Decimal) -> Result<Vec<Shipment>, ServiceError> {
        self.store.find_by_freight(freight).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_quantity(&self, quantity: i32) -> Result<Vec<Shipment>, ServiceError> {
        self.store.find_by_quantity(quantity).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_delivered_date(
        &self,
        delivered_date: NaiveDate,
    ) -> Result<Vec<Shipment>, ServiceError> {
        self.store.find_by_delivered_date(delivered_date).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_arrival_date(
        &self,
        arrival_date: NaiveDate,
    ) -> Result<Vec<Shipment>, ServiceError> {
        self.store.find_by_arrival_date(arrival_date).await
    }

    /// Creates a new shipment.
    ///
    /// Checks run in order and the first failure wins: field validation, id uniqueness,
    /// code uniqueness. Nothing is written unless all three pass.
    #[instrument(skip(self, candidate), fields(id = candidate.id, code = candidate.code))]
    pub async fn create(&self, candidate: Shipment) -> Result<Shipment, ServiceError> {
        self.ensure_valid(&candidate)?;

        if self.store.find_by_id(candidate.id).await?.is_some() {
            warn!("Rejected shipment with duplicate id");
            return Err(ServiceError::validation_message(ENTITY, DUPLICATE_ID));
        }

        if self.store.find_by_code(candidate.code).await?.is_some() {
            warn!("Rejected shipment with duplicate code");
            return Err(ServiceError::validation_message(ENTITY, DUPLICATE_CODE));
        }

        let saved = self.store.save(candidate).await?;
        counter!("shipments.created", 1);
        info!("Shipment created");
        Ok(saved)
    }

    /// Updates the mutable fields of the shipment at `id` from `request`.
    ///
    /// The stored `id` and `code` are kept. The code check runs against `request.code`
    /// before the record is looked up, so an unknown `id` whose request code collides is
    /// reported as a validation failure rather than `NotFound`.
    #[instrument(skip(self, request), fields(code = request.code))]
    pub async fn update(&self, id: i64, request: Shipment) -> Result<Shipment, ServiceError> {
        self.ensure_valid(&request)?;

        if let Some(holder) = self.store.find_by_code(request.code).await? {
            if !(self.config.allow_own_code_on_update && holder.id == id) {
                warn!(holder_id = holder.id, "Rejected update with duplicate code");
                return Err(ServiceError::validation_message(ENTITY, DUPLICATE_CODE));
            }
        }

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;

        let saved = self
            .store
            .save(existing.with_updated_fields(&request))
            .await?;
        counter!("shipments.updated", 1);
        info!("Shipment updated");
        Ok(saved)
    }

    /// Deletes the shipment at `id`, failing with `NotFound` when absent
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;

        self.store.delete(existing).await?;
        counter!("shipments.deleted", 1);
        info!("Shipment deleted");
        Ok(())
    }

    fn ensure_valid(&self, shipment: &Shipment) -> Result<(), ServiceError> {
        let violations = self.validator.validate(shipment);
        if violations.is_empty() {
            return Ok(());
        }
        warn!(count = violations.len(), "Shipment failed validation");
        Err(ServiceError::violations(ENTITY, violations))
    }
}
