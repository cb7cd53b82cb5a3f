//! Error type shared by the scheduling core and its collaborators.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::NurseId;

/// Errors surfaced to the caller of a scheduling operation.
///
/// Capacity problems (no eligible nurse, empty catalog during the sweep) are
/// not represented here: they are absorbed by the run and reported through
/// [`GeneratedSchedule::unfilled`](crate::scheduler::GeneratedSchedule).
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("Invalid day name: {0}")]
    InvalidWeekday(String),

    #[error("Unknown shift type: {0}")]
    UnknownShiftType(String),

    #[error("Nurse with ID {0} not found")]
    NurseNotFound(NurseId),

    #[error("Schedule {0} not found")]
    ScheduleNotFound(Uuid),

    #[error("Failed to read requirement catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed requirement catalog: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = ScheduleError> = std::result::Result<T, E>;
