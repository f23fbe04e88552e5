//! Configuration module for the hierarchy tracker.
//! Defines and manages application-wide settings and dependencies.
mod dependencies;

pub use dependencies::{Dependencies, TrackerConfig};
