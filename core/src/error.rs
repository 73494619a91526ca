//! Error types for the domain core
//!
//! This module provides the domain error taxonomy shared by the submission
//! workflow, the repositories and the projection layer. Adapter failures are
//! wrapped as connectivity errors; everything else is a domain rejection
//! detected at the workflow step that discovers it.

use thiserror::Error;

use crate::graph::StoreError;

/// Domain error type
#[derive(Error, Debug)]
pub enum DomainError {
    /// The customer email is not registered
    #[error("\"{0}\" has not been found in our customers list.")]
    CustomerNotFound(String),

    /// A receipt line item references a product that does not exist
    #[error("\"{0}\" has not been found in our products list.")]
    ProductNotFound(String),

    /// No store matches the submitted name and address
    #[error("The store \"{0}\" does not exist in our stores list.")]
    StoreNotFound(String),

    /// The receipt timestamp does not parse under the required format
    #[error("The timestamp you provided is not within the format: \"dd/mm/yyyy hh:mm\"")]
    InvalidTimestamp,

    /// A receipt with the same customer, timestamp and total already exists
    #[error("The receipt you're trying to submit already exists.")]
    DuplicateReceipt,

    /// Failure reaching the graph store
    #[error("Graph store error: {0}")]
    Connectivity(#[from] StoreError),
}

/// Result type for domain operations
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::CustomerNotFound("jane@example.com".to_string());
        assert_eq!(
            err.to_string(),
            "\"jane@example.com\" has not been found in our customers list."
        );

        let err = DomainError::ProductNotFound("oat milk".to_string());
        assert_eq!(
            err.to_string(),
            "\"oat milk\" has not been found in our products list."
        );

        let err = DomainError::StoreNotFound("Corner Shop".to_string());
        assert_eq!(
            err.to_string(),
            "The store \"Corner Shop\" does not exist in our stores list."
        );

        let err = DomainError::InvalidTimestamp;
        assert_eq!(
            err.to_string(),
            "The timestamp you provided is not within the format: \"dd/mm/yyyy hh:mm\""
        );

        let err = DomainError::DuplicateReceipt;
        assert_eq!(
            err.to_string(),
            "The receipt you're trying to submit already exists."
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::Connection("refused".to_string());
        let err: DomainError = store_err.into();
        match err {
            DomainError::Connectivity(_) => {}
            _ => panic!("Expected Connectivity variant"),
        }
    }
}
