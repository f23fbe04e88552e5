//! Hierarchy service error types.
//!
//! This module defines the unified error type for all hierarchy service
//! operations. The variants keep validation failures, unresolved record
//! references and store failures distinguishable, so the embedding request
//! handler can map them to its own response classes; the service itself
//! produces no transport status codes.

use hierarchy_repository::HierarchyRepositoryError;
use thiserror::Error;
use uuid::Uuid;

/// Unified errors from hierarchy service operations.
#[derive(Debug, Error)]
pub enum HierarchyServiceError {
    /// Required input is missing or blank (company, project name, data, or
    /// a search term).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced metadata record does not resolve.
    #[error("Hierarchy not found: {0}")]
    NotFound(Uuid),

    /// The underlying persistence operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] HierarchyRepositoryError),
}

impl HierarchyServiceError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
