//! Calendar date source for the calculators.
//!
//! The forecaster only needs "today" when a product has no history to anchor
//! the projection on. Routing that read through [`Clock`] keeps every
//! calculation deterministic under test.

use chrono::{Local, NaiveDate};

/// Source of the current calendar date.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the local date from the process clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
