//! Error types for the hierarchy tracker wiring.
//! Consolidates the errors that can occur while configuring and
//! initializing the tracker's dependencies.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Repository error: {0}")]
    Repository(#[from] hierarchy_repository::HierarchyRepositoryError),
    #[error("Service error: {0}")]
    Service(#[from] hierarchy_service::HierarchyServiceError),
}
