use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::models::Shipment;

/// A single failed constraint, tied to the field it was checked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Checks a shipment against its field constraints. An empty result means valid.
pub trait ShipmentValidator: Send + Sync {
    fn validate(&self, shipment: &Shipment) -> Vec<Violation>;
}

/// Validator backed by the `#[validate]` rules declared on the entity.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstraintValidator;

impl ShipmentValidator for ConstraintValidator {
    fn validate(&self, shipment: &Shipment) -> Vec<Violation> {
        let errors = match Validate::validate(shipment) {
            Ok(()) => return Vec::new(),
            Err(errors) => errors,
        };

        let mut violations: Vec<Violation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |err| {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    Violation::new(field, message)
                })
            })
            .collect();

        // field_errors() is a HashMap
        violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn shipment() -> Shipment {
        Shipment {
            id: 3,
            code: 300,
            description: "Refrigerated produce".to_string(),
            freight: dec!(120.40),
            consignee: "Harbor Foods".to_string(),
            quantity: 40,
            arrival_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            delivered_date: NaiveDate::from_ymd_opt(2024, 6, 11),
        }
    }

    #[test]
    fn valid_shipment_has_no_violations() {
        assert!(ConstraintValidator.validate(&shipment()).is_empty());
    }

    #[test]
    fn violations_are_sorted_by_field() {
        let invalid = Shipment {
            quantity: -4,
            consignee: String::new(),
            freight: dec!(-1),
            ..shipment()
        };

        let violations = ConstraintValidator.validate(&invalid);

        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["consignee", "freight", "quantity"]);
        assert_eq!(violations[1].message, "Freight cannot be negative");
        assert_eq!(violations[2].message, "Quantity cannot be negative");
    }
}
