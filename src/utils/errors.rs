//! Error handling for ExploreWithMe
//!
//! This module defines the main error type used throughout both services
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the ExploreWithMe services
#[derive(Error, Debug)]
pub enum ExploreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{entity} with id={id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    BusinessRuleViolation(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for ExploreWithMe operations
pub type Result<T> = std::result::Result<T, ExploreError>;

impl ExploreError {
    /// Shorthand for the most common failure in the service layer.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ExploreError::NotFound { entity, id }
    }

    /// Check if the error is a definitive business outcome rather than an
    /// infrastructure fault. Business outcomes are never retried.
    pub fn is_business_outcome(&self) -> bool {
        matches!(
            self,
            ExploreError::NotFound { .. }
                | ExploreError::BusinessRuleViolation(_)
                | ExploreError::AlreadyExists(_)
                | ExploreError::InvalidInput(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ExploreError::not_found("Event", 42);
        assert_eq!(err.to_string(), "Event with id=42 not found");
        assert!(err.is_business_outcome());
    }

    #[test]
    fn test_infrastructure_errors_are_not_business_outcomes() {
        let err = ExploreError::ServiceUnavailable("stats".to_string());
        assert!(!err.is_business_outcome());
        let err = ExploreError::Config("bad port".to_string());
        assert!(!err.is_business_outcome());
    }
}
