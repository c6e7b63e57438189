//! Calendar month a counter belongs to.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, TallyError};

/// A validated (year, month) pair. Month is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub const MIN_YEAR: i32 = 1;
    pub const MAX_YEAR: i32 = 9999;

    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(TallyError::InvalidPeriod(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(TallyError::InvalidPeriod(format!(
                "year must be between {} and {}, got {year}",
                Self::MIN_YEAR,
                Self::MAX_YEAR
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
