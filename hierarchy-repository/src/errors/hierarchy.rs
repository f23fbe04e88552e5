//! Error types for the hierarchy repository.
//! Defines specific errors that can occur during database operations on
//! hierarchy metadata and data snapshots.
use thiserror::Error;
use uuid::Uuid;

/// Represents errors that can occur within the hierarchy repository.
///
/// This enum consolidates various error conditions specific to database
/// interactions, such as SQLx errors during database operations and rows
/// that no longer decode into the domain types.
#[derive(Debug, Error)]
pub enum HierarchyRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// The partial unique index on active drafts rejected an insert: the
    /// (company, project, location) tuple already has an editable draft.
    #[error("An active draft already exists for company `{company}`, project `{project_name}`")]
    ActiveDraftExists {
        company: String,
        project_name: String,
    },

    #[error("Invalid hierarchy status `{status}` stored for record {id}")]
    InvalidStatus { id: Uuid, status: String },

    #[error("Invalid user input payload stored for record {id}: {source}")]
    InvalidUserInput {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(serde_json::Error),
}
