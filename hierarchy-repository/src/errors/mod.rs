//! Error types for the hierarchy repository.
//! Consolidates and re-exports error types related to hierarchy store operations.
mod hierarchy;

pub use hierarchy::HierarchyRepositoryError;
