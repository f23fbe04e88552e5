//! PostgreSQL implementation of the hierarchy repository.
mod hierarchy_repository;

pub use hierarchy_repository::PostgresHierarchyRepository;

/// Embedded schema migrations for the hierarchy store.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("src/postgres/migrations");
