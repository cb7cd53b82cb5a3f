//! DTOs for REST API requests/responses.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assignment::Shortfall;
use crate::domain::{AssignedShift, Nurse, NurseId, Preference, Schedule};
use crate::error::ScheduleError;
use crate::scheduler::GeneratedSchedule;

/// Preference as submitted by clients: raw day and shift names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDto {
    pub day: String,
    pub shift: String,
}

impl From<&Preference> for PreferenceDto {
    fn from(p: &Preference) -> Self {
        Self {
            day: p.day.to_string(),
            shift: p.shift.to_string(),
        }
    }
}

impl TryFrom<&PreferenceDto> for Preference {
    type Error = ScheduleError;

    fn try_from(dto: &PreferenceDto) -> Result<Self, Self::Error> {
        Ok(Preference::new(dto.day.parse()?, dto.shift.parse()?))
    }
}

/// Body of `POST /nurses/preferences`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetPreferencesRequest {
    pub id: NurseId,
    pub preferences: Vec<PreferenceDto>,
}

impl SetPreferencesRequest {
    /// Validates every preference; the first bad day or shift name fails the request.
    pub fn to_preferences(&self) -> Result<Vec<Preference>, ScheduleError> {
        self.preferences.iter().map(Preference::try_from).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurseDto {
    pub id: NurseId,
    pub name: String,
    pub preferences: Vec<PreferenceDto>,
}

impl From<&Nurse> for NurseDto {
    fn from(n: &Nurse) -> Self {
        Self {
            id: n.id,
            name: n.name.clone(),
            preferences: n.preferences.iter().map(PreferenceDto::from).collect(),
        }
    }
}

/// Nurse reference embedded in a shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurseRefDto {
    pub id: NurseId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftDto {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub shift_type: String,
    pub nurse: NurseRefDto,
}

impl From<&AssignedShift> for ShiftDto {
    fn from(s: &AssignedShift) -> Self {
        Self {
            date: s.date,
            shift_type: s.shift.to_string(),
            nurse: NurseRefDto {
                id: s.nurse_id,
                name: s.nurse_name.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDto {
    pub id: Uuid,
    pub shifts: Vec<ShiftDto>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<&Schedule> for ScheduleDto {
    fn from(s: &Schedule) -> Self {
        Self {
            id: s.id,
            shifts: s.shifts.iter().map(ShiftDto::from).collect(),
            created: s.created,
            updated: s.updated,
        }
    }
}

/// A slot the run could not staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfilledDto {
    pub shift: String,
    pub day_of_week: String,
    pub nurses_required: u32,
    pub missing: u32,
}

impl From<&Shortfall> for UnfilledDto {
    fn from(s: &Shortfall) -> Self {
        Self {
            shift: s.requirement.shift.to_string(),
            day_of_week: s.requirement.day_of_week.to_string(),
            nurses_required: s.requirement.nurses_required,
            missing: s.missing,
        }
    }
}

/// Response of `POST /schedules`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedScheduleDto {
    #[serde(flatten)]
    pub schedule: ScheduleDto,
    pub unfilled: Vec<UnfilledDto>,
}

impl From<&GeneratedSchedule> for GeneratedScheduleDto {
    fn from(g: &GeneratedSchedule) -> Self {
        Self {
            schedule: ScheduleDto::from(&g.schedule),
            unfilled: g.unfilled.iter().map(UnfilledDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
}
