//! Dashboard summary of one month.
//!
//! Rows and columns follow catalog order. Only departments with at least one
//! non-zero count over the catalog issue types get a row; column totals cover
//! those rows, and counts keyed by names outside the catalog are ignored.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::counts::MonthCounts;
use crate::period::Period;

/// Count for one issue type within a row or column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTotal {
    pub issue_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRow {
    pub department: String,
    /// One entry per catalog issue type, in catalog order.
    pub counts: Vec<IssueTotal>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub departments: Vec<DepartmentRow>,
    pub by_issue_type: Vec<IssueTotal>,
    pub grand_total: u64,
}

impl MonthSummary {
    pub fn build(catalog: &Catalog, period: Period, counts: &MonthCounts) -> Self {
        let mut by_issue_type: Vec<IssueTotal> = catalog
            .issue_types()
            .iter()
            .map(|t| IssueTotal {
                issue_type: t.clone(),
                count: 0,
            })
            .collect();

        let mut departments = Vec::new();
        for dept in catalog.departments() {
            let row: Vec<IssueTotal> = catalog
                .issue_types()
                .iter()
                .map(|t| IssueTotal {
                    issue_type: t.clone(),
                    count: counts.get(dept, t),
                })
                .collect();
            let total: u64 = row.iter().map(|c| c.count).sum();
            if total == 0 {
                continue;
            }

            for (col, cell) in by_issue_type.iter_mut().zip(row.iter()) {
                col.count += cell.count;
            }
            departments.push(DepartmentRow {
                department: dept.clone(),
                counts: row,
                total,
            });
        }

        let grand_total = by_issue_type.iter().map(|c| c.count).sum();

        Self {
            year: period.year(),
            month: period.month(),
            departments,
            by_issue_type,
            grand_total,
        }
    }

    pub fn total_for(&self, issue_type: &str) -> u64 {
        self.by_issue_type
            .iter()
            .find(|c| c.issue_type == issue_type)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}
