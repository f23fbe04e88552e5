//! This module defines and re-exports the interfaces for the hierarchy repository.
//! It serves as a central point for accessing traits related to data interaction.
mod hierarchy;

pub use hierarchy::HierarchyRepository;
