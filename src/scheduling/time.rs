//! Time-of-day and calendar window arithmetic
//!
//! Appointments carry a plain calendar date and local `HH:MM` times of day.
//! Dates are compared as calendar components, never converted through a
//! timezone, so a booking on 2024-01-10 stays on 2024-01-10 everywhere.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::errors::TeamCalError;

/// A local wall-clock time of day, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Build from hour and minute components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, TeamCalError> {
        if hour > 23 || minute > 59 {
            return Err(TeamCalError::Validation(format!(
                "Time out of range: {:02}:{:02}",
                hour, minute
            )));
        }
        Ok(Self {
            minutes: u16::from(hour) * 60 + u16::from(minute),
        })
    }

    pub fn hour(&self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(&self) -> u8 {
        (self.minutes % 60) as u8
    }

    /// Minutes since midnight
    pub fn minutes_from_midnight(&self) -> u16 {
        self.minutes
    }
}

impl FromStr for TimeOfDay {
    type Err = TeamCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| TeamCalError::Validation(format!("Invalid time format: {}", s)))?;
        // u8::parse would accept a leading sign, so require bare digits
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(h) || !two_digits(m) {
            return Err(TeamCalError::Validation(format!("Invalid time format: {}", s)));
        }
        let hour: u8 = h
            .parse()
            .map_err(|_| TeamCalError::Validation(format!("Invalid time format: {}", s)))?;
        let minute: u8 = m
            .parse()
            .map_err(|_| TeamCalError::Validation(format!("Invalid time format: {}", s)))?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = TeamCalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// A half-open time range `[start, end)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeSlot {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, TeamCalError> {
        if end <= start {
            return Err(TeamCalError::Validation(format!(
                "End time {} must be after start time {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// General half-open overlap test: `[s1,e1)` and `[s2,e2)` overlap
    /// iff `s1 < e2 && s2 < e1`. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// An inclusive range of calendar days, used by calendar views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

/// Window covering exactly one day.
pub fn day_window(date: NaiveDate) -> DateWindow {
    DateWindow { first: date, last: date }
}

/// Monday-to-Sunday window containing `date`.
pub fn week_window(date: NaiveDate) -> DateWindow {
    let offset = date.weekday().num_days_from_monday() as i64;
    let first = date - Duration::days(offset);
    DateWindow {
        first,
        last: first + Duration::days(6),
    }
}

/// First-to-last day of the month containing `date`.
pub fn month_window(date: NaiveDate) -> DateWindow {
    let first = date.with_day(1).unwrap_or(date);
    let last = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    }
    .map(|next_first| next_first - Duration::days(1))
    .unwrap_or(date);
    DateWindow { first, last }
}
