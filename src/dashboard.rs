//! Derived state for the admin dashboard.
//!
//! Every function here is a pure pass over one snapshot of records. Nothing is
//! cached between calls, so a refreshed snapshot is simply passed in again.

use crate::sort::SortState;
use crate::types::{BugRecord, Severity, Status};
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;

pub const WINDOW_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
    pub critical: usize, // Blocker + Critical, any status
    pub total: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct Partition<'a> {
    pub active: Vec<&'a BugRecord>,
    pub completed: Vec<&'a BugRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub submitted: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

/// Resolved records are deliberately absent from the open/in-progress/closed
/// buckets; they only show up in `total`.
pub fn bucket_by_status(records: &[BugRecord]) -> StatusCounts {
    let mut counts = StatusCounts {
        total: records.len(),
        ..StatusCounts::default()
    };

    for bug in records {
        match bug.status {
            Status::Open => counts.open += 1,
            Status::InProgress => counts.in_progress += 1,
            Status::Closed => counts.closed += 1,
            Status::Resolved | Status::Unclassified => {}
        }
        if bug.is_critical() {
            counts.critical += 1;
        }
    }

    counts
}

pub fn split_active_completed<'a, I>(records: I) -> Partition<'a>
where
    I: IntoIterator<Item = &'a BugRecord>,
{
    let mut partition = Partition::default();
    for bug in records {
        if bug.is_completed() {
            partition.completed.push(bug);
        } else {
            partition.active.push(bug);
        }
    }
    partition
}

pub fn severity_histogram(records: &[BugRecord]) -> [SeverityCount; 5] {
    let mut histogram = Severity::KNOWN.map(|severity| SeverityCount { severity, count: 0 });
    for bug in records {
        if let Some(slot) = histogram.iter_mut().find(|s| s.severity == bug.severity) {
            slot.count += 1;
        }
    }
    histogram
}

/// Seven calendar days ending at `reference`, oldest first. Days are taken in
/// `tz`, so a record created late in the evening lands on the viewer's date.
///
/// `submitted` counts records created on the day. `resolved` counts closed
/// records on their closure day when known, otherwise on their creation day.
/// Anything outside the window is dropped, not clamped to an edge bucket.
pub fn weekly_series<Tz: TimeZone>(
    records: &[BugRecord],
    reference: NaiveDate,
    tz: &Tz,
) -> [DayBucket; WINDOW_DAYS] {
    let mut series: [DayBucket; WINDOW_DAYS] = std::array::from_fn(|i| DayBucket {
        date: reference
            .checked_sub_days(Days::new((WINDOW_DAYS - 1 - i) as u64))
            .unwrap_or(NaiveDate::MIN),
        submitted: 0,
        resolved: 0,
    });

    for bug in records {
        if let Some(idx) = bucket_index(bug.created_at, reference, tz) {
            series[idx].submitted += 1;
        }
        if bug.is_completed() {
            let closed_on = bug.closed_at.unwrap_or(bug.created_at);
            if let Some(idx) = bucket_index(closed_on, reference, tz) {
                series[idx].resolved += 1;
            }
        }
    }

    series
}

fn bucket_index<Tz: TimeZone>(at: DateTime<Utc>, reference: NaiveDate, tz: &Tz) -> Option<usize> {
    let day = at.with_timezone(tz).date_naive();
    let age = reference.signed_duration_since(day).num_days();
    if (0..WINDOW_DAYS as i64).contains(&age) {
        Some(WINDOW_DAYS - 1 - age as usize)
    } else {
        None
    }
}

/// The "my reported issues" table: one reporter's records, exact name match,
/// ordered by the reporter's own header clicks.
pub fn reporter_view<'a>(records: &'a [BugRecord], reporter: &str, sort: &SortState) -> Vec<&'a BugRecord> {
    let mine = records
        .iter()
        .filter(|b| b.reporter.as_deref() == Some(reporter))
        .collect();
    sort.order(mine)
}

/// Everything the admin view renders for one snapshot.
#[derive(Debug, Serialize)]
pub struct Dashboard<'a> {
    pub reference_date: NaiveDate,
    pub sort: SortState,
    pub counts: StatusCounts,
    #[serde(flatten)]
    pub partition: Partition<'a>,
    pub weekly: [DayBucket; WINDOW_DAYS],
    pub severity: [SeverityCount; 5],
}

impl<'a> Dashboard<'a> {
    pub fn build<Tz: TimeZone>(
        records: &'a [BugRecord],
        sort: &SortState,
        reference: NaiveDate,
        tz: &Tz,
    ) -> Self {
        log::debug!(
            "building dashboard over {} records (sort {:?}, reference {})",
            records.len(),
            sort,
            reference
        );

        Self {
            reference_date: reference,
            sort: *sort,
            counts: bucket_by_status(records),
            partition: split_active_completed(sort.apply(records)),
            weekly: weekly_series(records, reference, tz),
            severity: severity_histogram(records),
        }
    }

    pub fn has_active_blocker(&self) -> bool {
        self.partition
            .active
            .iter()
            .any(|b| b.severity == Severity::Blocker)
    }
}
