//! # Hierarchy Shared
//! This crate defines shared data structures used across the hierarchy tracker
//! workspace. It includes common definitions for version metadata, data
//! snapshots, the lifecycle status, the submission identity payload, and the
//! M&A review projections.
pub mod types;
