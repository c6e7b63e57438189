//! Issue Tally server library entry.
//!
//! Wires config, the counter store, the clock, metrics and the HTTP surface
//! into one router. Consumed by the binary (`main.rs`) and by integration
//! tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod api;
pub mod app_state;
pub mod clock;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
