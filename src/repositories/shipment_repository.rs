use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::errors::ServiceError;
use crate::models::shipment::{Column, Entity as ShipmentEntity, Model as ShipmentModel};
use crate::repositories::ShipmentStore;

/// sea-orm backed store for shipments
#[derive(Debug, Clone)]
pub struct ShipmentRepository {
    db: Arc<DatabaseConnection>,
}

impl ShipmentRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn find_where(
        &self,
        filter: sea_orm::sea_query::SimpleExpr,
    ) -> Result<Vec<ShipmentModel>, ServiceError> {
        ShipmentEntity::find()
            .filter(filter)
            .order_by_asc(Column::Id)
            .all(self.db())
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

#[async_trait]
impl ShipmentStore for ShipmentRepository {
    async fn find_all(&self) -> Result<Vec<ShipmentModel>, ServiceError> {
        ShipmentEntity::find()
            .order_by_asc(Column::Id)
            .all(self.db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShipmentModel>, ServiceError> {
        ShipmentEntity::find_by_id(id)
            .one(self.db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn find_by_code(&self, code: i64) -> Result<Option<ShipmentModel>, ServiceError> {
        ShipmentEntity::find()
            .filter(Column::Code.eq(code))
            .order_by_asc(Column::Id)
            .one(self.db())
            .await
            .map_err(ServiceError::DatabaseError)
    }

    async fn find_by_freight(&self, freight: Decimal) -> Result<Vec<ShipmentModel>, ServiceError> {
        self.find_where(Column::Freight.eq(freight)).await
    }

    async fn find_by_quantity(&self, quantity: i32) -> Result<Vec<ShipmentModel>, ServiceError> {
        self.find_where(Column::Quantity.eq(quantity)).await
    }

    async fn find_by_delivered_date(
        &self,
        delivered_date: NaiveDate,
    ) -> Result<Vec<ShipmentModel>, ServiceError> {
        self.find_where(Column::DeliveredDate.eq(delivered_date))
            .await
    }

    async fn find_by_arrival_date(
        &self,
        arrival_date: NaiveDate,
    ) -> Result<Vec<ShipmentModel>, ServiceError> {
        self.find_where(Column::ArrivalDate.eq(arrival_date)).await
    }

    async fn save(&self, shipment: ShipmentModel) -> Result<ShipmentModel, ServiceError> {
        let exists = ShipmentEntity::find_by_id(shipment.id)
            .one(self.db())
            .await?
            .is_some();

        // every column is written, so the stored row mirrors `shipment` exactly
        let active = shipment.into_active_model().reset_all();

        let saved = if exists {
            debug!("Updating shipment row {:?}", active.id);
            active.update(self.db()).await
        } else {
            debug!("Inserting shipment row {:?}", active.id);
            active.insert(self.db()).await
        };

        saved.map_err(|e| {
            error!("Failed to save shipment: {}", e);
            ServiceError::DatabaseError(e)
        })
    }

    async fn delete(&self, shipment: ShipmentModel) -> Result<(), ServiceError> {
        let id = shipment.id;
        shipment.delete(self.db()).await.map_err(|e| {
            error!("Failed to delete shipment {}: {}", id, e);
            ServiceError::DatabaseError(e)
        })?;
        Ok(())
    }
}
