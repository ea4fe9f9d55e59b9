use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rec_gov::{INPUT_DATE_FORMAT, format_upstream_date};
use serde::{Deserialize, Serialize};

use crate::ScanError;

/// Which calendar dates of a [`DateWindow`] must be free.
///
/// Campground checks and pass checks have always used different rules; both are
/// kept as named policies so callers pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateWindowPolicy {
    /// The nights of the stay: `end - i` for `i` in `1..=N` where
    /// `N = (end - start)` in days, i.e. `start` up to and including `end - 1`.
    Nights,
    /// Only the start date. The end date is ignored.
    StartDateOnly,
}

/// Requested date range for a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// First requested date
    pub start: NaiveDate,
    /// Last requested date (check-out day for campgrounds)
    pub end: NaiveDate,
}

impl DateWindow {
    /// Build a window without validating the order of the dates.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build a window, rejecting ranges where `end` is not after `start`.
    pub fn validated(start: NaiveDate, end: NaiveDate) -> Result<Self, ScanError> {
        if end <= start {
            return Err(ScanError::InvalidDateRange {
                start: start.format(INPUT_DATE_FORMAT).to_string(),
                end: end.format(INPUT_DATE_FORMAT).to_string(),
            });
        }
        Ok(Self::new(start, end))
    }

    /// Parse both ends from `YYYY-MM-DD` strings and validate the range.
    pub fn parse(start: &str, end: &str) -> Result<Self, ScanError> {
        Self::validated(parse_input_date(start)?, parse_input_date(end)?)
    }

    /// Whole days between start and end; negative when the window is inverted.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Dates that must be free under `policy`.
    pub fn target_dates(&self, policy: DateWindowPolicy) -> HashSet<NaiveDate> {
        match policy {
            DateWindowPolicy::Nights => (1..=self.num_days())
                .map(|i| self.end - Duration::days(i))
                .collect(),
            DateWindowPolicy::StartDateOnly => HashSet::from([self.start]),
        }
    }

    /// Target dates in the upstream midnight-UTC string form.
    pub fn target_date_strings(&self, policy: DateWindowPolicy) -> HashSet<String> {
        self.target_dates(policy)
            .into_iter()
            .map(format_upstream_date)
            .collect()
    }
}

/// Parse a `YYYY-MM-DD` date given on the command line or in a query string.
pub fn parse_input_date(s: &str) -> Result<NaiveDate, ScanError> {
    NaiveDate::parse_from_str(s.trim(), INPUT_DATE_FORMAT)
        .map_err(|_| ScanError::InvalidDate(s.to_string()))
}

const UPSTREAM_MIDNIGHT_SUFFIX: &str = "T00:00:00Z";

/// Parse a key of a per-site availability mapping.
///
/// Accepts the upstream `YYYY-MM-DDT00:00:00Z` form as well as a bare
/// `YYYY-MM-DD`; anything else yields `None`.
pub fn parse_upstream_date(key: &str) -> Option<NaiveDate> {
    let day = key.get(..10)?;
    let rest = &key[10..];
    if !rest.is_empty() && rest != UPSTREAM_MIDNIGHT_SUFFIX {
        return None;
    }
    NaiveDate::parse_from_str(day, INPUT_DATE_FORMAT).ok()
}
