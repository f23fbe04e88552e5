//! Request and response types for hierarchy service operations.

use hierarchy_shared::types::{HierarchyData, HierarchyMetadata, UserInput};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

/// Request to create the root version of a new hierarchy.
#[derive(Clone, Debug)]
pub struct CreateHierarchyRequest {
    /// Identity payload; `company` must be non-blank.
    pub user_input: UserInput,
    pub project_name: String,
    /// Sequence of entity records making up the first snapshot.
    pub data: Value,
    /// Archive an existing active draft for the same
    /// (company, project, location) tuple before inserting.
    pub force_new: bool,
}

/// Request to supersede an existing draft with a new version.
#[derive(Clone, Debug)]
pub struct CreateVersionRequest {
    pub parent_id: Uuid,
    pub data: Value,
    /// Reviewer note that prompted the new version; stored as `{"text": ...}`.
    pub user_feedback: Option<String>,
}

/// A metadata record together with one data snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchyRecord {
    pub metadata: HierarchyMetadata,
    pub data: HierarchyData,
}

/// A metadata record together with all of its snapshots, most recent first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchyDetail {
    pub metadata: HierarchyMetadata,
    pub data: Vec<HierarchyData>,
}

/// One group of versions sharing a (company, location, project) tuple.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchyGroup {
    pub company: String,
    /// Display location; `"Global"` when the group has no location.
    pub location: String,
    pub project_name: String,
    /// Members ordered by version number descending.
    pub versions: Vec<HierarchyMetadata>,
}

/// One matched entity with its similarity score (0.0 is exact).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntityMatch {
    pub entity: Value,
    pub score: f64,
}

/// All matches found within one hierarchy's latest snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntitySearchHit {
    pub metadata: HierarchyMetadata,
    pub matches: Vec<EntityMatch>,
}
