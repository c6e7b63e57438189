//! Counter key and the per-month nested mapping returned to clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Department, IssueType};
use crate::period::Period;

/// Composite key of one counter row. At most one row exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub period: Period,
    pub department: Department,
    pub issue_type: IssueType,
}

impl CounterKey {
    pub fn new(period: Period, department: Department, issue_type: IssueType) -> Self {
        Self {
            period,
            department,
            issue_type,
        }
    }
}

/// `department -> issue_type -> count` for a single month.
///
/// Tuples with no row are absent and read as 0. Serializes as a plain nested
/// JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthCounts(BTreeMap<String, BTreeMap<String, u64>>);

impl MonthCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one stored row.
    pub fn insert(&mut self, department: impl Into<String>, issue_type: impl Into<String>, count: u64) {
        self.0
            .entry(department.into())
            .or_default()
            .insert(issue_type.into(), count);
    }

    pub fn get(&self, department: &str, issue_type: &str) -> u64 {
        self.0
            .get(department)
            .and_then(|types| types.get(issue_type))
            .copied()
            .unwrap_or(0)
    }

    /// Whether a row exists for the tuple (a reset row exists with count 0).
    pub fn contains(&self, department: &str, issue_type: &str) -> bool {
        self.0
            .get(department)
            .is_some_and(|types| types.contains_key(issue_type))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of stored rows.
    pub fn rows(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}

impl FromIterator<(String, String, u64)> for MonthCounts {
    fn from_iter<I: IntoIterator<Item = (String, String, u64)>>(iter: I) -> Self {
        let mut out = MonthCounts::new();
        for (department, issue_type, count) in iter {
            out.insert(department, issue_type, count);
        }
        out
    }
}
