use crate::types::{HierarchyStatus, UserInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One version of one hierarchy submission.
///
/// Records are never deleted; status transitions, the active-draft flag and
/// the M&A review flag are the only mutable parts. Every other field is
/// fixed at insert time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HierarchyMetadata {
    pub id: Uuid,
    pub user_input: UserInput,
    pub project_name: String,
    /// Human-readable label, `"v<version_number>"`.
    pub version: String,
    pub version_number: i32,
    pub status: HierarchyStatus,
    /// At most one record per (company, project, location) carries this flag
    /// together with `in-draft` status.
    pub is_active_draft: bool,
    /// First record of the chain; `None` on the root itself.
    pub root_hierarchy_id: Option<Uuid>,
    pub user_feedback: Option<Value>,
    pub has_ma_update: bool,
    pub last_ma_checked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl HierarchyMetadata {
    /// Chain key: the record's own id for roots, the recorded root otherwise.
    pub fn root_id(&self) -> Uuid {
        self.root_hierarchy_id.unwrap_or(self.id)
    }
}

/// Field set for inserting a new metadata record.
#[derive(Clone, Debug)]
pub struct NewHierarchyMetadata {
    pub user_input: UserInput,
    pub project_name: String,
    pub version: String,
    pub version_number: i32,
    pub status: HierarchyStatus,
    pub user_feedback: Option<Value>,
    pub root_hierarchy_id: Option<Uuid>,
}

impl NewHierarchyMetadata {
    /// Root record at `version_number = 0` for a fresh submission.
    pub fn root(user_input: UserInput, project_name: impl Into<String>) -> Self {
        Self {
            user_input,
            project_name: project_name.into(),
            version: version_label(0),
            version_number: 0,
            status: HierarchyStatus::InDraft,
            user_feedback: None,
            root_hierarchy_id: None,
        }
    }

    /// Next version derived from `parent`, carrying the identity fields
    /// forward and pointing at the parent's chain root.
    pub fn next_version(parent: &HierarchyMetadata, user_feedback: Option<Value>) -> Self {
        let version_number = parent.version_number + 1;
        Self {
            user_input: parent.user_input.clone(),
            project_name: parent.project_name.clone(),
            version: version_label(version_number),
            version_number,
            status: HierarchyStatus::InDraft,
            user_feedback,
            root_hierarchy_id: Some(parent.root_id()),
        }
    }
}

/// Display label for a version number.
pub fn version_label(version_number: i32) -> String {
    format!("v{version_number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(version_number: i32, root: Option<Uuid>) -> HierarchyMetadata {
        HierarchyMetadata {
            id: Uuid::new_v4(),
            user_input: UserInput::new("Acme"),
            project_name: "ProjectX".to_string(),
            version: version_label(version_number),
            version_number,
            status: HierarchyStatus::InDraft,
            is_active_draft: true,
            root_hierarchy_id: root,
            user_feedback: None,
            has_ma_update: false,
            last_ma_checked: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn next_version_from_a_root_points_at_the_root_itself() {
        let root = metadata(0, None);
        let next = NewHierarchyMetadata::next_version(&root, None);
        assert_eq!(next.version_number, 1);
        assert_eq!(next.version, "v1");
        assert_eq!(next.root_hierarchy_id, Some(root.id));
        assert_eq!(next.status, HierarchyStatus::InDraft);
    }

    #[test]
    fn next_version_deeper_in_the_chain_keeps_the_recorded_root() {
        let root_id = Uuid::new_v4();
        let parent = metadata(3, Some(root_id));
        let next = NewHierarchyMetadata::next_version(&parent, None);
        assert_eq!(next.version_number, 4);
        assert_eq!(next.root_hierarchy_id, Some(root_id));
        assert_eq!(next.project_name, parent.project_name);
        assert_eq!(next.user_input, parent.user_input);
    }
}
