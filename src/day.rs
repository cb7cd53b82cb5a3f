//! Weekday index used for distance computation and date derivation.
//!
//! The canonical index runs Sunday = 0 through Saturday = 6 and is not
//! circular: Saturday and Sunday are six days apart, not one.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;

/// One of the seven canonical weekday names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    /// All days in index order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    /// Returns the canonical 0–6 index (Sunday = 0).
    ///
    /// ```
    /// use nurse_scheduling::day::DayOfWeek;
    ///
    /// assert_eq!(DayOfWeek::Sunday.index(), 0);
    /// assert_eq!(DayOfWeek::Saturday.index(), 6);
    /// ```
    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks a day up by its canonical index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }

    /// Absolute difference of the two indices, without wraparound.
    ///
    /// ```
    /// use nurse_scheduling::day::DayOfWeek;
    ///
    /// assert_eq!(DayOfWeek::Saturday.distance(DayOfWeek::Sunday), 6);
    /// assert_eq!(DayOfWeek::Thursday.distance(DayOfWeek::Friday), 1);
    /// ```
    pub fn distance(self, other: DayOfWeek) -> usize {
        self.index().abs_diff(other.index())
    }

    /// Returns the next occurrence of this weekday on or after `today`
    /// (0 to 6 days ahead).
    pub fn next_date_from(self, today: NaiveDate) -> NaiveDate {
        let today_index = DayOfWeek::from(today.weekday()).index();
        let days_to_add = (self.index() + 7 - today_index) % 7;
        today + Duration::days(days_to_add as i64)
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sun => DayOfWeek::Sunday,
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str() == s)
            .ok_or_else(|| ScheduleError::InvalidWeekday(s.to_string()))
    }
}

impl TryFrom<String> for DayOfWeek {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayOfWeek> for &'static str {
    fn from(day: DayOfWeek) -> Self {
        day.as_str()
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
