use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shipment_service::{
    config::ShipmentsConfig,
    db::{self, DbConfig},
    ConstraintValidator, Shipment, ShipmentRepository, ShipmentService, ShipmentStore,
};

/// Service wired to a freshly migrated in-memory SQLite database.
pub struct TestContext {
    pub service: ShipmentService,
    pub store: Arc<ShipmentRepository>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(ShipmentsConfig::default()).await
    }

    pub async fn with_config(config: ShipmentsConfig) -> Self {
        let pool = db::establish_connection_with_config(&DbConfig::in_memory())
            .await
            .expect("failed to open in-memory database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let store = Arc::new(ShipmentRepository::new(Arc::new(pool)));
        let service = ShipmentService::new(
            store.clone() as Arc<dyn ShipmentStore>,
            Arc::new(ConstraintValidator),
        )
        .with_config(config);

        Self { service, store }
    }

    pub async fn stored_count(&self) -> usize {
        self.store.find_all().await.expect("list shipments").len()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}

pub fn shipment(id: i64, code: i64, quantity: i32, freight: Decimal) -> Shipment {
    Shipment {
        id,
        code,
        description: format!("Shipment {id}"),
        freight,
        consignee: "Central Depot".to_string(),
        quantity,
        arrival_date: date(2024, 1, 15),
        delivered_date: None,
    }
}
