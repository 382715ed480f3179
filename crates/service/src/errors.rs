use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// No row matches the id.
    #[error("{message}")]
    NotFound { id: i32, message: String },
    /// Caller-supplied data broke a rule; nothing was written.
    #[error("{0}")]
    Validation(String),
    /// Storage failure or an unexpected storage outcome.
    #[error("{message}")]
    Service {
        message: String,
        #[source]
        source: Option<DbErr>,
    },
}

impl ServiceError {
    pub fn not_found(id: i32) -> Self {
        Self::NotFound { id, message: format!("Dog with ID {id} not found") }
    }

    pub fn not_found_for(id: i32, action: &str) -> Self {
        Self::NotFound { id, message: format!("Dog with ID {id} not found for {action}") }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a storage error, keeping it as the source.
    pub fn storage(context: impl AsRef<str>, err: DbErr) -> Self {
        Self::Service { message: format!("{}: {}", context.as_ref(), err), source: Some(err) }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Service { message: message.into(), source: None }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::NotFound { .. } => 1003,
            ServiceError::Service { .. } => 1200,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn not_found_carries_id() {
        let e = ServiceError::not_found_for(9, "deletion");
        assert_eq!(e.to_string(), "Dog with ID 9 not found for deletion");
        assert!(matches!(e, ServiceError::NotFound { id: 9, .. }));
    }

    #[test]
    fn storage_error_keeps_cause() {
        let e = ServiceError::storage("Error while retrieving all dogs", DbErr::Custom("connection refused".into()));
        let msg = e.to_string();
        assert!(msg.starts_with("Error while retrieving all dogs: "));
        assert!(msg.contains("connection refused"));
        assert!(e.source().is_some());
        assert_eq!(e.code(), 1200);
    }
}
