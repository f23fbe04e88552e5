//! # Hierarchy Service
//!
//! This crate provides the core engines of the hierarchy tracker: the
//! version-chain lifecycle (draft → approval → archive), the lookup and
//! grouping views, entity fuzzy search over the latest data snapshots, and
//! the M&A review side-channel. Persistence is delegated to a
//! `HierarchyRepository` implementation.

pub mod config;
pub mod errors;
pub mod matching;
pub mod service;
pub mod types;

pub use config::HierarchyServiceConfig;
pub use errors::HierarchyServiceError;
pub use matching::{NormalizedLevenshteinScorer, SimilarityScorer};
pub use service::HierarchyService;
pub use types::{
    CreateHierarchyRequest, CreateVersionRequest, EntityMatch, EntitySearchHit, HierarchyDetail,
    HierarchyGroup, HierarchyRecord,
};
