//! Time window resolution: turning a (granularity, anchor-date) pair
//! into a concrete half-open interval, bucket rule, and axis labeling.
//!
//! Filtering uses the half-open test `start <= ts < end` everywhere.
//! For the month and year granularities `end` is the *last calendar
//! day* of the period at implicit midnight, so readings later in that
//! final day fall outside the window. The bucket axis still spans the
//! full period; covered by tests below.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ANCHOR_FORMAT: &str = "%Y-%m-%d";

/// Window resolution error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("invalid anchor date '{text}', expected YYYY-MM-DD")]
    InvalidDate { text: String },
}

/// Chart granularity: one day, one month, or one year per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Granularity {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err("invalid granularity; expected day, month or year"),
        }
    }
}

/// A resolved aggregation window.
///
/// Ephemeral: recomputed on every aggregation request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub granularity: Granularity,
    pub anchor: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Parse the anchor text and resolve the window for it.
    pub fn resolve(granularity: Granularity, anchor_text: &str) -> Result<Self, WindowError> {
        let anchor = NaiveDate::parse_from_str(anchor_text.trim(), ANCHOR_FORMAT).map_err(
            |_| WindowError::InvalidDate {
                text: anchor_text.to_string(),
            },
        )?;
        Ok(Self::from_date(granularity, anchor))
    }

    /// Resolve the window for an already-parsed anchor date.
    pub fn from_date(granularity: Granularity, anchor: NaiveDate) -> Self {
        let (start, end) = match granularity {
            Granularity::Day => {
                let start = anchor.and_hms_opt(0, 0, 0).unwrap();
                (start, start + chrono::Duration::days(1))
            }
            Granularity::Month => {
                let first = anchor.with_day(1).unwrap();
                let last = last_day_of_month(anchor);
                (
                    first.and_hms_opt(0, 0, 0).unwrap(),
                    last.and_hms_opt(0, 0, 0).unwrap(),
                )
            }
            Granularity::Year => {
                let first = NaiveDate::from_ymd_opt(anchor.year(), 1, 1).unwrap();
                let last = NaiveDate::from_ymd_opt(anchor.year(), 12, 31).unwrap();
                (
                    first.and_hms_opt(0, 0, 0).unwrap(),
                    last.and_hms_opt(0, 0, 0).unwrap(),
                )
            }
        };

        Self {
            granularity,
            anchor,
            start,
            end,
        }
    }

    /// Half-open membership test: `start <= ts < end`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Number of bucket slots the axis spans.
    ///
    /// Derived from the bucket rule, not from the data: hours for a day
    /// window, calendar days for a month window, months for a year
    /// window. Trailing slots can stay empty after aggregation.
    pub fn bucket_count(&self) -> usize {
        match self.granularity {
            Granularity::Day => 24,
            Granularity::Month => last_day_of_month(self.anchor).day() as usize,
            Granularity::Year => 12,
        }
    }

    /// Slot index for a timestamp inside the window.
    pub fn bucket_index(&self, ts: NaiveDateTime) -> usize {
        match self.granularity {
            Granularity::Day => ts.hour() as usize,
            Granularity::Month => ts.day() as usize - 1,
            Granularity::Year => ts.month() as usize - 1,
        }
    }

    /// Two-digit axis label for a slot.
    pub fn bucket_label(&self, slot: usize) -> String {
        match self.granularity {
            Granularity::Day => format!("{slot:02}"),
            Granularity::Month | Granularity::Year => format!("{:02}", slot + 1),
        }
    }

    /// All axis labels in slot order.
    pub fn axis_labels(&self) -> Vec<String> {
        (0..self.bucket_count()).map(|s| self.bucket_label(s)).collect()
    }

    /// Axis title for the bucket dimension.
    pub fn axis_title(&self) -> &'static str {
        match self.granularity {
            Granularity::Day => "Hour",
            Granularity::Month => "Day",
            Granularity::Year => "Month",
        }
    }
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .unwrap();
    first_of_next.pred_opt().unwrap()
}
