use crate::types::BugRecord;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Severity,
    Created,
    Title,
    Status,
}

impl SortKey {
    // Title and status compare by their stored text, as the reporter table does.
    fn compare(self, a: &BugRecord, b: &BugRecord) -> Ordering {
        match self {
            SortKey::Severity => a.severity.weight().cmp(&b.severity.weight()),
            SortKey::Created => a.created_at.cmp(&b.created_at),
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Column sort state of the active table, driven by header clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    /// A second click on the same column flips to ascending; any other click
    /// (new column, or the same column while ascending) sorts descending.
    pub fn toggle(&mut self, key: SortKey) {
        self.direction = if self.key == Some(key) && self.direction == SortDirection::Descending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        self.key = Some(key);
    }

    pub fn from_clicks(clicks: &[SortKey]) -> Self {
        let mut state = SortState::default();
        for key in clicks {
            state.toggle(*key);
        }
        state
    }

    pub fn apply<'a>(&self, records: &'a [BugRecord]) -> Vec<&'a BugRecord> {
        self.order(records.iter().collect())
    }

    /// Same as [`SortState::apply`] over an already borrowed selection.
    pub fn order<'a>(&self, mut records: Vec<&'a BugRecord>) -> Vec<&'a BugRecord> {
        if let Some(key) = self.key {
            sort_refs(&mut records, key, self.direction);
        }
        records
    }
}

// `sort_by` is stable, and descending flips the comparison rather than the
// result, so ties keep their input order both ways.
fn sort_refs(records: &mut [&BugRecord], key: SortKey, direction: SortDirection) {
    match direction {
        SortDirection::Ascending => records.sort_by(|a, b| key.compare(a, b)),
        SortDirection::Descending => records.sort_by(|a, b| key.compare(b, a)),
    }
}

/// Stable sort by severity weight; equal weights keep their input order in
/// both directions.
pub fn sort_by_severity(records: &[BugRecord], direction: SortDirection) -> Vec<&BugRecord> {
    let mut sorted: Vec<&BugRecord> = records.iter().collect();
    sort_refs(&mut sorted, SortKey::Severity, direction);
    sorted
}

pub fn sort_by_created(records: &[BugRecord], direction: SortDirection) -> Vec<&BugRecord> {
    let mut sorted: Vec<&BugRecord> = records.iter().collect();
    sort_refs(&mut sorted, SortKey::Created, direction);
    sorted
}
