//! WakeRoom-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, ExperienceId, SessionId, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WakeRoomError {
    SessionNotFound(SessionId),

    ExperienceNotFound(ExperienceId),

    /// `end` was called on a session that already ended.
    AlreadyEnded(SessionId),

    ValidationFailed {
        field: String,
        message: String,
    },

    Forbidden,

    Infrastructure(String),
}

impl WakeRoomError {
    pub fn session_not_found(id: SessionId) -> Self {
        WakeRoomError::SessionNotFound(id)
    }

    pub fn experience_not_found(id: ExperienceId) -> Self {
        WakeRoomError::ExperienceNotFound(id)
    }

    pub fn already_ended(id: SessionId) -> Self {
        WakeRoomError::AlreadyEnded(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WakeRoomError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        WakeRoomError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WakeRoomError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            WakeRoomError::ExperienceNotFound(_) => ErrorCode::ExperienceNotFound,
            WakeRoomError::AlreadyEnded(_) => ErrorCode::SessionAlreadyEnded,
            WakeRoomError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            WakeRoomError::Forbidden => ErrorCode::Forbidden,
            WakeRoomError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            WakeRoomError::SessionNotFound(id) => format!("Session not found: {}", id),
            WakeRoomError::ExperienceNotFound(id) => format!("Experience not found: {}", id),
            WakeRoomError::AlreadyEnded(_) => "Session already ended".to_string(),
            WakeRoomError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            WakeRoomError::Forbidden => "Administrator role required".to_string(),
            WakeRoomError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for WakeRoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for WakeRoomError {}

impl From<ValidationError> for WakeRoomError {
    fn from(err: ValidationError) -> Self {
        WakeRoomError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for WakeRoomError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => WakeRoomError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => WakeRoomError::Infrastructure(err.to_string()),
        }
    }
}

impl From<WakeRoomError> for DomainError {
    fn from(err: WakeRoomError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_ended_has_its_own_code() {
        let err = WakeRoomError::already_ended(SessionId::new());
        assert_eq!(err.code(), ErrorCode::SessionAlreadyEnded);
        assert_eq!(err.to_string(), "Session already ended");
    }

    #[test]
    fn rating_validation_keeps_field_name() {
        let err: WakeRoomError = ValidationError::out_of_range("rating", 1, 5, 8).into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(matches!(err, WakeRoomError::ValidationFailed { ref field, .. } if field == "rating"));
    }

    #[test]
    fn storage_failures_become_infrastructure() {
        let err: WakeRoomError = DomainError::database("insert session", "pool closed").into();
        assert!(matches!(err, WakeRoomError::Infrastructure(_)));
    }
}
