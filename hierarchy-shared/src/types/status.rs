use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of one hierarchy version.
///
/// Versions start in draft, and `approved` and `archived` are terminal:
/// no exposed operation leaves either state again.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HierarchyStatus {
    /// Submission that has not been approved or superseded yet.
    #[serde(rename = "in-draft")]
    InDraft,
    /// The single approved member of its chain.
    #[serde(rename = "approved")]
    Approved,
    /// Superseded or replaced member.
    #[serde(rename = "archived")]
    Archived,
}

impl HierarchyStatus {
    /// Wire and database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyStatus::InDraft => "in-draft",
            HierarchyStatus::Approved => "approved",
            HierarchyStatus::Archived => "archived",
        }
    }

    /// Whether the record still counts as live for company-wide listings.
    pub fn is_live(&self) -> bool {
        matches!(self, HierarchyStatus::InDraft | HierarchyStatus::Approved)
    }
}

impl fmt::Display for HierarchyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HierarchyStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in-draft" => Ok(HierarchyStatus::InDraft),
            "approved" => Ok(HierarchyStatus::Approved),
            "archived" => Ok(HierarchyStatus::Archived),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Returned when a stored status string is not a known lifecycle state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown hierarchy status: {}", self.0)
    }
}

impl std::error::Error for ParseStatusError {}
