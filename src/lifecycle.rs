use crate::source::BugSource;
use crate::types::{BugRecord, Status};
use anyhow::Result;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Only resolved bugs may be closed.
    NotResolved { current: Status },
    /// Reopening applies to closed bugs only.
    NotClosed { current: Status },
    Forbidden { from: Status, to: Status },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::NotResolved { current } => write!(
                f,
                "cannot close a bug that is '{}'; mark it Resolved first",
                current
            ),
            TransitionError::NotClosed { current } => {
                write!(f, "cannot reopen a bug that is '{}'; only Closed bugs reopen", current)
            }
            TransitionError::Forbidden { from, to } => {
                write!(f, "status change '{}' -> '{}' is not allowed", from, to)
            }
        }
    }
}

impl std::error::Error for TransitionError {}

impl Status {
    /// Open, In Progress and Resolved move freely between each other; Closed is
    /// reached only from Resolved and left only by reopening to In Progress.
    pub fn can_transition_to(self, next: Status) -> bool {
        use Status::*;

        if self == next {
            return true;
        }
        match (self, next) {
            (Open | InProgress | Resolved, Open | InProgress | Resolved) => true,
            (Resolved, Closed) => true,
            (Closed, InProgress) => true,
            (Unclassified, Open) => true,
            _ => false,
        }
    }
}

pub fn check_transition(current: Status, next: Status) -> Result<(), TransitionError> {
    if current.can_transition_to(next) {
        return Ok(());
    }
    if next == Status::Closed && current != Status::Unclassified {
        return Err(TransitionError::NotResolved { current });
    }
    Err(TransitionError::Forbidden { from: current, to: next })
}

/// Outcome of a status change made through a [`BugSource`].
#[derive(Debug, Clone)]
pub struct Applied {
    pub previous: Status,
    pub record: BugRecord,
}

fn current_status(source: &dyn BugSource, id: &str) -> Result<Status> {
    source
        .list_bugs()?
        .iter()
        .find(|b| b.id == id)
        .map(|b| b.status)
        .ok_or_else(|| anyhow::anyhow!("No bug with id {}", id))
}

/// Fetches the bug, checks the move against the lifecycle, then updates it.
/// Nothing is written when the move is refused.
pub fn apply(source: &dyn BugSource, id: &str, next: Status) -> Result<Applied> {
    let previous = current_status(source, id)?;
    check_transition(previous, next)?;

    let record = source.update_status(id, next)?;
    Ok(Applied { previous, record })
}

pub fn reopen(source: &dyn BugSource, id: &str) -> Result<Applied> {
    let previous = current_status(source, id)?;
    if previous != Status::Closed {
        return Err(TransitionError::NotClosed { current: previous }.into());
    }

    let record = source.update_status(id, Status::InProgress)?;
    Ok(Applied { previous, record })
}
