use crate::types::{BugRecord, Severity, Status, NO_FILE_PLACEHOLDER};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    MissingTitle,
    MissingDescription,
    MissingReporter,
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::MissingTitle => f.write_str("a bug report needs a title"),
            SubmissionError::MissingDescription => f.write_str("a bug report needs a description"),
            SubmissionError::MissingReporter => f.write_str("a bug report needs a reporter"),
        }
    }
}

impl std::error::Error for SubmissionError {}

/// A report as typed by the user, before the backend assigns id and timestamp.
#[derive(Debug, Clone, Default)]
pub struct NewBug {
    pub title: String,
    pub description: String,
    pub reporter: String,
    pub severity: Severity,
    pub affected_file: Option<String>,
}

/// Body of `POST /api/bugs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugPayload {
    pub title: String,
    pub description: String,
    pub reporter: String,
    pub severity: Severity,
    pub status: Status,
    pub affected_file: String,
}

impl NewBug {
    /// New reports always start Open; a blank file name becomes the placeholder.
    pub fn into_payload(self) -> Result<BugPayload, SubmissionError> {
        let title = self.title.trim().to_string();
        let description = self.description.trim().to_string();
        let reporter = self.reporter.trim().to_string();

        if title.is_empty() {
            return Err(SubmissionError::MissingTitle);
        }
        if description.is_empty() {
            return Err(SubmissionError::MissingDescription);
        }
        if reporter.is_empty() {
            return Err(SubmissionError::MissingReporter);
        }

        let affected_file = self
            .affected_file
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| NO_FILE_PLACEHOLDER.to_string());

        Ok(BugPayload {
            title,
            description,
            reporter,
            severity: self.severity,
            status: Status::Open,
            affected_file,
        })
    }
}

impl BugPayload {
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> BugRecord {
        BugRecord {
            id,
            title: self.title,
            description: self.description,
            reporter: Some(self.reporter),
            severity: self.severity,
            status: self.status,
            affected_file: self.affected_file,
            created_at,
            closed_at: None,
        }
    }
}
