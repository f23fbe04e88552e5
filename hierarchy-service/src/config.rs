//! Configuration types for the HierarchyService.

/// Default similarity threshold for entity fuzzy search.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Configuration for the `HierarchyService`.
///
/// Currently this covers the fuzzy-search cutoff. Scores are normalized
/// distances (0.0 is an exact match); entities scoring above the threshold
/// are excluded from search results.
#[derive(Debug, Clone)]
pub struct HierarchyServiceConfig {
    /// Maximum score an entity match may have and still be returned.
    pub similarity_threshold: f64,
}

impl Default for HierarchyServiceConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl HierarchyServiceConfig {
    /// Create a config with a custom similarity threshold.
    ///
    /// Lower values keep only tighter matches; 0.0 keeps exact matches only.
    pub fn with_similarity_threshold(similarity_threshold: f64) -> Self {
        Self {
            similarity_threshold,
        }
    }
}
