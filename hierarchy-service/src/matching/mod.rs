//! Entity-name matching for the fuzzy-search engine.
//!
//! The scorer is a pluggable seam: any approximate-string-matching
//! implementation with normalized-distance semantics can replace the
//! default one.
mod scorer;

pub use scorer::{NormalizedLevenshteinScorer, SimilarityScorer};
