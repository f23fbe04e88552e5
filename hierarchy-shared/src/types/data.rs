use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One stored payload snapshot for a metadata record.
///
/// Snapshots are append-only per metadata record, most-recent-first by
/// creation time. The single exception is the M&A payload correction, which
/// overwrites the latest snapshot's `data` in place and bumps `updated_at`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HierarchyData {
    pub id: Uuid,
    pub metadata_id: Uuid,
    /// Sequence of entity records. Each entry is expected to carry an
    /// `entityName` field; the rest of the shape is opaque to the tracker.
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
