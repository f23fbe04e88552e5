use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity payload supplied with a hierarchy submission.
///
/// `company` is required; `location` is optional, and an empty string is
/// treated the same as an absent location everywhere the tuple
/// (company, project, location) is matched. Additional fields are preserved
/// untouched so the payload round-trips through the store unchanged.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserInput {
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserInput {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            location: None,
            extra: Map::new(),
        }
    }

    pub fn with_location(company: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            location: Some(location.into()),
            extra: Map::new(),
        }
    }

    /// Location with empty strings collapsed to `None`.
    pub fn normalized_location(&self) -> Option<&str> {
        self.location.as_deref().filter(|location| !location.is_empty())
    }
}
