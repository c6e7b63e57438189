//! JSON API consumed by the client application.
//!
//! - `GET  /api/data/:year/:month`    : month mapping
//! - `POST /api/increment`            : bump a counter in the current month
//! - `POST /api/reset`                : zero a counter in the current month
//! - `GET  /api/catalog`              : allowed departments and issue types
//! - `GET  /api/summary/:year/:month` : dashboard totals

pub mod error;
pub mod handlers;

pub use error::ApiError;
