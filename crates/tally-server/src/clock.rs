//! Source of the server's current month.
//!
//! Increment and reset always act on the month the server is in, never on a
//! date sent by the client.

use chrono::{Datelike, Local};

use tally_core::{Period, Result};

pub trait Clock: Send + Sync {
    fn current_period(&self) -> Result<Period>;
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_period(&self) -> Result<Period> {
        let now = Local::now();
        Period::new(now.year(), now.month())
    }
}

/// Always reports the same month.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Period);

impl Clock for FixedClock {
    fn current_period(&self) -> Result<Period> {
        Ok(self.0)
    }
}
