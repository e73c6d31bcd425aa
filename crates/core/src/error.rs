use crate::types::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short, user-facing text suitable for an inline form message or toast.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::NotFound { entity, .. } => format!("{entity} no longer exists"),
            CoreError::Validation(msg)
            | CoreError::Conflict(msg)
            | CoreError::Unauthorized(msg)
            | CoreError::Forbidden(msg) => msg.clone(),
            CoreError::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_includes_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Student",
            id: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Entity not found: Student with id 42");
        assert_eq!(err.user_message(), "Student no longer exists");
    }

    #[test]
    fn internal_message_is_sanitized() {
        let err = CoreError::Internal("pool exhausted".to_string());
        assert_eq!(err.user_message(), "An internal error occurred");
    }
}
