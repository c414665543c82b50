//! Time window predicate
//!
//! A closed interval over modification times. Both the rolling variant and
//! the explicit range are inclusive at both ends; a file stamped exactly at
//! `start` or `end` is in the window.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

use crate::error::{Result, ScanError};

/// Closed time interval, `start <= end`
///
/// Rolling windows are derived from a single `now` snapshot taken once per
/// job run and reused for every comparison; the clock is never re-read per
/// file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Explicit range, inclusive at both ends
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(ScanError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Rolling window `[now - lookback, now]`
    ///
    /// A lookback that underflows the representable time range clamps to the
    /// earliest representable instant.
    pub fn rolling(now: DateTime<Utc>, lookback: Duration) -> Self {
        let span = ChronoDuration::from_std(lookback).unwrap_or(ChronoDuration::MAX);
        let start = now
            .checked_sub_signed(span)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self { start, end: now }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `ts` falls inside the window, boundaries included
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
