use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Shipment entity model
///
/// `id` is assigned by the caller and never changes once stored. `code` is the business
/// identifier; both are expected to be unique across the table, which the service checks
/// before every write.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "shipments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    pub code: i64,

    #[validate(length(
        min = 1,
        max = 500,
        message = "Description must be between 1 and 500 characters"
    ))]
    pub description: String,

    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    #[validate(custom = "validate_freight")]
    pub freight: Decimal,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Consignee must be between 1 and 100 characters"
    ))]
    pub consignee: String,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,

    pub arrival_date: NaiveDate,

    pub delivered_date: Option<NaiveDate>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Returns a copy of `self` carrying every mutable field from `patch`.
    ///
    /// Identity (`id`, `code`) always comes from `self`; whatever `patch` holds there is
    /// ignored.
    pub fn with_updated_fields(self, patch: &Model) -> Model {
        Model {
            id: self.id,
            code: self.code,
            description: patch.description.clone(),
            freight: patch.freight,
            consignee: patch.consignee.clone(),
            quantity: patch.quantity,
            arrival_date: patch.arrival_date,
            delivered_date: patch.delivered_date,
        }
    }
}

// bounds of the DECIMAL(12, 2) freight column
const FREIGHT_SCALE: u32 = 2;
const FREIGHT_LIMIT: i64 = 10_000_000_000;

fn validate_freight(freight: &Decimal) -> Result<(), ValidationError> {
    let (code, message) = if *freight < Decimal::ZERO {
        ("freight_negative", "Freight cannot be negative")
    } else if freight.normalize().scale() > FREIGHT_SCALE {
        (
            "freight_scale",
            "Freight cannot have more than 2 decimal places",
        )
    } else if *freight >= Decimal::from(FREIGHT_LIMIT) {
        ("freight_too_large", "Freight must be below 10000000000")
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    Err(err)
}
