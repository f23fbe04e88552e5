//! Error types for the hierarchy service.
//! Consolidates and re-exports the service-level error taxonomy.
mod hierarchy_service;

pub use hierarchy_service::HierarchyServiceError;
