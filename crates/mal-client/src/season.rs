//! Anime seasons and the clock used to pick the current one.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::ApiError;

/// Broadcast season, one per calendar quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Season for a calendar month (1 = January)
    ///
    /// Months 1-3 are winter, 4-6 spring, 7-9 summer, 10-12 fall. Values
    /// outside 1-12 clamp to the nearest end of the year.
    pub fn from_month(month: u32) -> Self {
        match month {
            0..=3 => Season::Winter,
            4..=6 => Season::Spring,
            7..=9 => Season::Summer,
            _ => Season::Fall,
        }
    }

    /// Season a date falls in
    pub fn for_date(date: NaiveDate) -> Self {
        Self::from_month(date.month())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Season {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" => Ok(Season::Fall),
            _ => Err(ApiError::InvalidArgument(format!("Invalid season: {}", s))),
        }
    }
}

/// Source of "today" for defaults that depend on the current date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the local system date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
