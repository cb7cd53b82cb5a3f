//! Domain model for nurse scheduling.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::day::DayOfWeek;
use crate::error::ScheduleError;

pub type NurseId = u64;

/// Kind of shift a requirement or preference refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Day,
    Night,
}

impl ShiftType {
    pub const ALL: [ShiftType; 2] = [ShiftType::Day, ShiftType::Night];

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftType::Day => "day",
            ShiftType::Night => "night",
        }
    }
}

impl FromStr for ShiftType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(ShiftType::Day),
            "night" => Ok(ShiftType::Night),
            _ => Err(ScheduleError::UnknownShiftType(s.to_string())),
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A nurse's declared wish to work a given slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Preference {
    pub day: DayOfWeek,
    pub shift: ShiftType,
}

impl Preference {
    pub fn new(day: DayOfWeek, shift: ShiftType) -> Self {
        Self { day, shift }
    }
}

/// A nurse who can be assigned to shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nurse {
    pub id: NurseId,
    pub name: String,
    #[serde(default)]
    pub preferences: Vec<Preference>,
}

impl Nurse {
    pub fn new(id: NurseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            preferences: Vec::new(),
        }
    }

    pub fn with_preferences(mut self, preferences: impl IntoIterator<Item = Preference>) -> Self {
        self.preferences.extend(preferences);
        self
    }

    /// Returns true if any preference equals the given slot.
    pub fn prefers(&self, day: DayOfWeek, shift: ShiftType) -> bool {
        self.preferences
            .iter()
            .any(|p| p.day == day && p.shift == shift)
    }
}

/// Staffing target for one (weekday, shift type) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequirement {
    pub shift: ShiftType,
    pub day_of_week: DayOfWeek,
    pub nurses_required: u32,
}

impl ShiftRequirement {
    pub fn new(shift: ShiftType, day_of_week: DayOfWeek, nurses_required: u32) -> Self {
        Self {
            shift,
            day_of_week,
            nurses_required,
        }
    }
}

/// One nurse placed on one dated shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedShift {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub shift: ShiftType,
    pub nurse_id: NurseId,
    pub nurse_name: String,
}

impl AssignedShift {
    /// Weekday the shift's date falls on.
    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from(self.date.weekday())
    }
}

/// A stored schedule: every shift produced by one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub shifts: Vec<AssignedShift>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}
