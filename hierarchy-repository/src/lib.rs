//! # Hierarchy Repository
//! This crate provides traits and implementations for interacting with the
//! hierarchy data store. It includes definitions for errors, interfaces,
//! and a concrete implementation for PostgreSQL.
pub mod errors;
pub mod interfaces;
pub mod postgres;

pub use errors::HierarchyRepositoryError;
pub use interfaces::HierarchyRepository;
pub use postgres::{MIGRATOR, PostgresHierarchyRepository};
