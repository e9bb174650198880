//! Append-only status history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AssignmentError;

/// Status text recorded when an assignment is created
pub const CREATED_STATUS: &str = "Создано";

/// Status text recorded before every edit
pub const UPDATED_STATUS: &str = "Обновлено";

/// One entry of the status log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

/// Insertion-ordered status history
///
/// Entries are only ever appended. Timestamps are kept as recorded and may
/// repeat or run backwards when the clock is coarse, so readers must rely on
/// position rather than sort by time. A stored log without entries is
/// rejected on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StatusEntry>", into = "Vec<StatusEntry>")]
pub struct StatusLog(Vec<StatusEntry>);

impl StatusLog {
    /// A log holding the creation entry
    pub fn started(at: DateTime<Utc>) -> Self {
        Self(vec![StatusEntry {
            timestamp: at,
            status: CREATED_STATUS.to_string(),
        }])
    }

    pub(crate) fn append(&mut self, at: DateTime<Utc>, status: impl Into<String>) {
        self.0.push(StatusEntry {
            timestamp: at,
            status: status.into(),
        });
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a log built through [`StatusLog::started`]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&StatusEntry> {
        self.0.first()
    }

    /// Most recently appended entry
    pub fn latest(&self) -> Option<&StatusEntry> {
        self.0.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEntry> {
        self.0.iter()
    }
}

impl TryFrom<Vec<StatusEntry>> for StatusLog {
    type Error = AssignmentError;

    fn try_from(entries: Vec<StatusEntry>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err(AssignmentError::validation("status log must hold at least one entry"));
        }
        Ok(Self(entries))
    }
}

impl From<StatusLog> for Vec<StatusEntry> {
    fn from(log: StatusLog) -> Self {
        log.0
    }
}
