//! # Hierarchy Tracker
//!
//! Wiring crate for the hierarchy tracker. It reads configuration from the
//! environment, builds the PostgreSQL pool, applies the schema migrations
//! and assembles the `HierarchyService`.
//!
//! The transport layer is an external collaborator: embed [`Dependencies`]
//! and call the service surface it exposes.

pub mod config;
pub mod errors;

pub use config::{Dependencies, TrackerConfig};
pub use errors::TrackerError;
