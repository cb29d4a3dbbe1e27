//! License-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | NotAvailable | 409 |
//! | DuplicateNumber | 409 |
//! | InvalidDiscount | 400 |
//! | ValidationFailed | 400 |
//! | Forbidden | 403 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, LicenseId, ValidationError};

use super::{LicenseNumber, LicenseStatus};

/// Message shown to operators for an unusable discount percentage.
pub const INVALID_DISCOUNT_MESSAGE: &str =
    "Invalid discount percentage. Please enter a valid number.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseError {
    NotFound(LicenseId),

    /// The license was not in a starting status the operation accepts.
    /// This is ordinary contention, surfaced to the user as "not available".
    NotAvailable {
        license_id: LicenseId,
        status: Option<LicenseStatus>,
    },

    DuplicateNumber(LicenseNumber),

    InvalidDiscount(String),

    ValidationFailed {
        field: String,
        message: String,
    },

    /// Caller lacks the administrative role.
    Forbidden,

    Infrastructure(String),
}

impl LicenseError {
    pub fn not_found(id: LicenseId) -> Self {
        LicenseError::NotFound(id)
    }

    pub fn not_available(license_id: LicenseId, status: Option<LicenseStatus>) -> Self {
        LicenseError::NotAvailable { license_id, status }
    }

    pub fn invalid_discount(input: impl Into<String>) -> Self {
        LicenseError::InvalidDiscount(input.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        LicenseError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        LicenseError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LicenseError::NotFound(_) => ErrorCode::LicenseNotFound,
            LicenseError::NotAvailable { .. } => ErrorCode::LicenseNotAvailable,
            LicenseError::DuplicateNumber(_) => ErrorCode::DuplicateLicenseNumber,
            LicenseError::InvalidDiscount(_) | LicenseError::ValidationFailed { .. } => {
                ErrorCode::ValidationFailed
            }
            LicenseError::Forbidden => ErrorCode::Forbidden,
            LicenseError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            LicenseError::NotFound(id) => format!("License not found: {}", id),
            LicenseError::NotAvailable { .. } => "License is not available".to_string(),
            LicenseError::DuplicateNumber(n) => format!("License number {} already exists", n),
            LicenseError::InvalidDiscount(_) => INVALID_DISCOUNT_MESSAGE.to_string(),
            LicenseError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            LicenseError::Forbidden => "Administrator role required".to_string(),
            LicenseError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, LicenseError::Infrastructure(_))
    }
}

impl std::fmt::Display for LicenseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for LicenseError {}

impl From<ValidationError> for LicenseError {
    fn from(err: ValidationError) -> Self {
        LicenseError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for LicenseError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => LicenseError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => LicenseError::Infrastructure(err.to_string()),
        }
    }
}

impl From<LicenseError> for DomainError {
    fn from(err: LicenseError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
