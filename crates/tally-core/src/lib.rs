//! Issue Tally core: domain types, validation, and the error surface.
//!
//! This crate defines the counter key, the catalog of allowed departments and
//! issue types, the month mapping returned by every API call, and the dashboard
//! summary. It carries no transport or runtime dependencies so the server,
//! the store backends and tests can share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Every fallible path surfaces as `TallyError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod catalog;
pub mod counts;
pub mod error;
pub mod period;
pub mod summary;

pub use catalog::{Catalog, Department, IssueType};
pub use counts::{CounterKey, MonthCounts};
/// Shared result type.
pub use error::{ClientCode, Result, TallyError};
pub use period::Period;
pub use summary::{DepartmentRow, IssueTotal, MonthSummary};
