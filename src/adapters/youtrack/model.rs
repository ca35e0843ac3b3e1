//! YouTrack issue representation (legacy `rest/issue` API).

use serde::Deserialize;
use serde_json::Value;

use super::error::YouTrackError;

/// An issue as returned by `GET rest/issue/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub field: Vec<IssueField>,
}

/// One named field of an issue. Values are untyped in the API.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueField {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl Issue {
    fn find(&self, name: &str) -> Option<&IssueField> {
        self.field.iter().find(|f| f.name == name)
    }

    /// Value of a required string field.
    pub fn field_string_value(&self, name: &str) -> Result<&str, YouTrackError> {
        self.find(name)
            .and_then(|f| f.value.as_str())
            .ok_or_else(|| YouTrackError::MissingField(name.to_string()))
    }

    /// Value of an optional string field. Absent, `null` and non-string
    /// values are all `None`.
    pub fn optional_string_value(&self, name: &str) -> Option<&str> {
        self.find(name).and_then(|f| f.value.as_str())
    }
}
