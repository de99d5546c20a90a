use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_FILE_PLACEHOLDER: &str = "No file specified";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Severity {
    Blocker,  // Stops a release outright
    Critical, // Data loss or outage
    High,
    #[default]
    Medium,
    Low,
    Unclassified, // Anything the backend stored outside the known set
}

impl Severity {
    /// The five known severities, highest priority first.
    pub const KNOWN: [Severity; 5] = [
        Severity::Blocker,
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Fixed ranking used for ordering only. Never persisted.
    pub fn weight(self) -> u8 {
        match self {
            Severity::Blocker => 5,
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
            Severity::Unclassified => 0,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Blocker" => Severity::Blocker,
            "Critical" => Severity::Critical,
            "High" => Severity::High,
            "Medium" => Severity::Medium,
            "Low" => Severity::Low,
            _ => Severity::Unclassified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Blocker => "Blocker",
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Unclassified => "Unclassified",
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        Severity::parse(&raw)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Status {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved, // Fixed, waiting for an admin to close
    Closed,
    Unclassified,
}

impl Status {
    pub const KNOWN: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Resolved,
        Status::Closed,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Open" => Status::Open,
            "In Progress" | "InProgress" | "in_progress" | "in-progress" => Status::InProgress,
            "Resolved" => Status::Resolved,
            "Closed" => Status::Closed,
            _ => Status::Unclassified,
        }
    }

    /// Name as stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
            Status::Unclassified => "Unclassified",
        }
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        Status::parse(&raw)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_affected_file() -> String {
    NO_FILE_PLACEHOLDER.to_string()
}

/// One reported defect, as returned by `GET /api/bugs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reporter: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub status: Status,
    #[serde(default = "default_affected_file")]
    pub affected_file: String,
    pub created_at: DateTime<Utc>,
    // Only present once a record has been closed through a backend that tracks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl BugRecord {
    pub fn new(id: &str, title: &str, severity: Severity, status: Status, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            reporter: None,
            severity,
            status,
            affected_file: default_affected_file(),
            created_at,
            closed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Closed
    }

    pub fn is_critical(&self) -> bool {
        matches!(self.severity, Severity::Blocker | Severity::Critical)
    }

    pub fn has_evidence(&self) -> bool {
        !self.affected_file.is_empty() && self.affected_file != NO_FILE_PLACEHOLDER
    }

    pub fn reporter_or_unknown(&self) -> &str {
        self.reporter.as_deref().filter(|r| !r.is_empty()).unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_document_with_mongo_id() {
        let raw = r#"{
            "_id": "65f1c0ffee",
            "title": "Login button dead",
            "description": "Nothing happens on click",
            "reporter": "dana",
            "severity": "Critical",
            "status": "In Progress",
            "affectedFile": "src/Login.js",
            "createdAt": "2024-03-13T09:15:00.000Z",
            "__v": 0
        }"#;

        let bug: BugRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(bug.id, "65f1c0ffee");
        assert_eq!(bug.severity, Severity::Critical);
        assert_eq!(bug.status, Status::InProgress);
        assert!(bug.has_evidence());
        assert!(bug.closed_at.is_none());
    }

    #[test]
    fn missing_fields_take_schema_defaults() {
        let raw = r#"{"id": "1", "title": "t", "createdAt": "2024-03-13T09:15:00Z"}"#;
        let bug: BugRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(bug.severity, Severity::Medium);
        assert_eq!(bug.status, Status::Open);
        assert_eq!(bug.affected_file, NO_FILE_PLACEHOLDER);
        assert!(!bug.has_evidence());
        assert_eq!(bug.reporter_or_unknown(), "Unknown");
    }

    #[test]
    fn unknown_enum_values_are_unclassified_not_rejected() {
        let raw = r#"{"id": "2", "severity": "Cosmetic", "status": "Wontfix",
                      "createdAt": "2024-03-13T09:15:00Z"}"#;
        let bug: BugRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(bug.severity, Severity::Unclassified);
        assert_eq!(bug.status, Status::Unclassified);
        assert_eq!(bug.severity.weight(), 0);
    }

    #[test]
    fn in_progress_serializes_with_backend_spelling() {
        assert_eq!(serde_json::to_string(&Status::InProgress).unwrap(), "\"In Progress\"");
        assert_eq!(Status::parse("in_progress"), Status::InProgress);
    }

    #[test]
    fn weights_follow_priority_order() {
        let weights: Vec<u8> = Severity::KNOWN.iter().map(|s| s.weight()).collect();
        assert_eq!(weights, vec![5, 4, 3, 2, 1]);
    }
}
