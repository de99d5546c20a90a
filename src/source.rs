use crate::submission::NewBug;
use crate::types::{BugRecord, Severity, Status};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const USER_AGENT: &str = concat!("strikelog/", env!("CARGO_PKG_VERSION"));

/// Where bug records come from and where status changes go.
pub trait BugSource {
    /// All visible records, most recent first.
    fn list_bugs(&self) -> Result<Vec<BugRecord>>;
    fn update_status(&self, id: &str, status: Status) -> Result<BugRecord>;
    /// Validates and stores a new report, returning it as persisted.
    fn submit(&self, bug: NewBug) -> Result<BugRecord>;
    fn remove(&self, id: &str) -> Result<()>;
}

/// Boundary checks applied to every fetched snapshot. Unknown enum values are
/// kept (aggregation treats them as unclassified) but reported.
pub fn ingest(mut records: Vec<BugRecord>) -> Vec<BugRecord> {
    for bug in &records {
        if bug.severity == Severity::Unclassified {
            log::warn!("bug {} has an unrecognized severity; treating as unclassified", bug.id);
        }
        if bug.status == Status::Unclassified {
            log::warn!("bug {} has an unrecognized status; treating as unclassified", bug.id);
        }
    }
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}

pub struct HttpSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn bug_url(&self, id: &str) -> String {
        format!("{}/api/bugs/{}", self.base_url, id)
    }
}

impl BugSource for HttpSource {
    fn list_bugs(&self) -> Result<Vec<BugRecord>> {
        let url = format!("{}/api/bugs", self.base_url);
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Listing bugs failed: HTTP {}", response.status());
        }

        let records: Vec<BugRecord> = response.json().context("Malformed bug list")?;
        Ok(ingest(records))
    }

    fn update_status(&self, id: &str, status: Status) -> Result<BugRecord> {
        let url = self.bug_url(id);
        log::debug!("PATCH {} -> {}", url, status);

        let response = self
            .client
            .patch(&url)
            .json(&json!({ "status": status }))
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Updating bug {} failed: HTTP {}", id, response.status());
        }

        // The backend answers `null` for an unknown id.
        let updated: Option<BugRecord> = response.json().context("Malformed bug in response")?;
        updated.ok_or_else(|| anyhow::anyhow!("No bug with id {}", id))
    }

    fn submit(&self, bug: NewBug) -> Result<BugRecord> {
        let payload = bug.into_payload()?;
        let url = format!("{}/api/bugs", self.base_url);
        log::debug!("POST {} ({})", url, payload.title);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Submitting bug failed: HTTP {}", response.status());
        }

        response.json().context("Malformed bug in response")
    }

    fn remove(&self, id: &str) -> Result<()> {
        let url = self.bug_url(id);
        log::debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Removing bug {} failed: HTTP {}", id, response.status());
        }
        Ok(())
    }
}

/// A JSON export of `GET /api/bugs`, edited in place.
///
/// Edits go through the raw JSON documents so that fields this crate does not
/// model, and enum values it does not recognize, survive untouched.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_documents(&self) -> Result<Vec<Value>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed bug snapshot in {}", self.path.display()))
    }

    fn write_documents(&self, documents: &[Value]) -> Result<()> {
        let content = serde_json::to_string_pretty(documents)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

fn document_id(document: &Value) -> Option<&str> {
    document
        .get("_id")
        .or_else(|| document.get("id"))
        .and_then(Value::as_str)
}

fn parse_document(document: &Value) -> Result<BugRecord> {
    BugRecord::deserialize(document).context("Malformed bug in snapshot")
}

impl BugSource for FileSource {
    fn list_bugs(&self) -> Result<Vec<BugRecord>> {
        log::debug!("reading snapshot {}", self.path.display());
        let records = self
            .read_documents()?
            .iter()
            .map(parse_document)
            .collect::<Result<Vec<_>>>()?;
        Ok(ingest(records))
    }

    fn update_status(&self, id: &str, status: Status) -> Result<BugRecord> {
        let mut documents = self.read_documents()?;
        let document = documents
            .iter_mut()
            .find(|d| document_id(d) == Some(id))
            .ok_or_else(|| anyhow::anyhow!("No bug with id {}", id))?;

        let previous = parse_document(document)?.status;
        let fields = document
            .as_object_mut()
            .ok_or_else(|| anyhow::anyhow!("Bug {} is not a JSON object", id))?;

        fields.insert("status".to_string(), json!(status));
        // A same-state move keeps the original closure day.
        if previous != status {
            if status == Status::Closed {
                fields.insert("closedAt".to_string(), json!(Utc::now()));
            } else {
                fields.remove("closedAt");
            }
        }

        let updated = parse_document(document)?;
        self.write_documents(&documents)?;
        Ok(updated)
    }

    fn submit(&self, bug: NewBug) -> Result<BugRecord> {
        let payload = bug.into_payload()?;
        let mut documents = self.read_documents()?;

        let record = payload.into_record(Uuid::new_v4().simple().to_string(), Utc::now());
        documents.insert(0, serde_json::to_value(&record)?);
        self.write_documents(&documents)?;
        Ok(record)
    }

    fn remove(&self, id: &str) -> Result<()> {
        let mut documents = self.read_documents()?;
        let before = documents.len();
        documents.retain(|d| document_id(d) != Some(id));
        if documents.len() == before {
            anyhow::bail!("No bug with id {}", id);
        }
        self.write_documents(&documents)
    }
}
