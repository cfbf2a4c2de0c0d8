use http::StatusCode;
use serde::Serialize;
use std::fmt;

use crate::validation::Violation;

/// What made a write fail validation: field-level violations, or a single message for
/// uniqueness conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ValidationDetail {
    Violations(Vec<Violation>),
    Message(String),
}

impl fmt::Display for ValidationDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationDetail::Violations(violations) => {
                let rendered = violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                write!(f, "{}", rendered)
            }
            ValidationDetail::Message(message) => write!(f, "{}", message),
        }
    }
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Validation failed for {entity}: {detail}")]
    ValidationFailed {
        entity: &'static str,
        detail: ValidationDetail,
    },

    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ServiceError::NotFound { entity, id }
    }

    pub fn violations(entity: &'static str, violations: Vec<Violation>) -> Self {
        ServiceError::ValidationFailed {
            entity,
            detail: ValidationDetail::Violations(violations),
        }
    }

    pub fn validation_message(entity: &'static str, message: impl Into<String>) -> Self {
        ServiceError::ValidationFailed {
            entity,
            detail: ValidationDetail::Message(message.into()),
        }
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Database errors return a generic message to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::not_found("Shipment", 7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::validation_message("Shipment", "bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_message_hides_database_details() {
        assert_eq!(
            ServiceError::DatabaseError(DbErr::Custom("password=hunter2".into()))
                .response_message(),
            "Database error"
        );
        assert_eq!(
            ServiceError::not_found("Shipment", 7).response_message(),
            "Shipment with id 7 not found"
        );
    }

    #[test]
    fn violations_render_field_and_message() {
        let err = ServiceError::violations(
            "Shipment",
            vec![
                Violation::new("consignee", "Consignee must be between 1 and 100 characters"),
                Violation::new("quantity", "Quantity cannot be negative"),
            ],
        );
        assert_eq!(
            err.to_string(),
            "Validation failed for Shipment: consignee: Consignee must be between 1 and 100 characters; quantity: Quantity cannot be negative"
        );
    }

    #[test]
    fn validation_failed_serializes_detail_untagged() {
        let err = ServiceError::validation_message(
            "Shipment",
            "A shipment with the same code already exists",
        );
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value["ValidationFailed"]["detail"],
            "A shipment with the same code already exists"
        );
        assert_eq!(value["ValidationFailed"]["entity"], "Shipment");
    }
}
