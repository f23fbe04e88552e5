use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row projection returned by the M&A trackable listing.
///
/// Covers every hierarchy still worth re-checking against external merger
/// and acquisition data, i.e. records that are in draft or approved.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrackedHierarchy {
    pub id: Uuid,
    pub company: String,
    pub has_ma_update: bool,
    pub last_ma_checked: Option<DateTime<Utc>>,
}

/// Current M&A review flag for one hierarchy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MaStatus {
    pub has_ma_update: bool,
    pub last_ma_checked: Option<DateTime<Utc>>,
}
