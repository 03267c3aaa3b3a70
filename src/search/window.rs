use std::ops::Range;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::{InputParseError, WindowError};

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Days searched when no window length is given.
pub const DEFAULT_NUM_DAYS: u32 = 7;

/// Candidate seconds `[start, start + num_days * 86400)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    start: i64,
    num_days: u32,
}

impl SearchWindow {
    pub fn new(start: i64, num_days: u32) -> Result<Self, WindowError> {
        if num_days == 0 {
            return Err(WindowError::Empty);
        }

        start
            .checked_add(i64::from(num_days) * SECONDS_PER_DAY)
            .ok_or(WindowError::Overflow { start, num_days })?;

        Ok(Self { start, num_days })
    }

    /// Window starting at midnight UTC of `date`.
    pub fn from_date(date: NaiveDate, num_days: u32) -> Result<Self, WindowError> {
        Self::new(start_of_day(date), num_days)
    }

    /// Window starting [`DEFAULT_NUM_DAYS`] days before `now`.
    pub fn recent(now: DateTime<Utc>, num_days: u32) -> Result<Self, WindowError> {
        let start = now - TimeDelta::days(i64::from(DEFAULT_NUM_DAYS));
        Self::new(start.timestamp(), num_days)
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    /// First second after the window.
    pub fn end(&self) -> i64 {
        self.start + self.len() as i64
    }

    /// Number of candidate seconds.
    pub fn len(&self) -> u64 {
        u64::from(self.num_days) * SECONDS_PER_DAY as u64
    }

    pub fn range(&self) -> Range<i64> {
        self.start..self.end()
    }

    /// Candidate seconds in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> {
        self.range()
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, InputParseError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| InputParseError::InvalidDate(input.to_string()))
}

/// UNIX timestamp of midnight UTC on `date`.
pub fn start_of_day(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// Renders a timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_utc(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}
