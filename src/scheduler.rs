//! Schedule generation: snapshot the inputs, build the week, store it.

use chrono::{Local, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::assignment::{build_week, Shortfall};
use crate::catalog::RequirementSource;
use crate::domain::Schedule;
use crate::error::Result;
use crate::store::{NurseRepository, ScheduleDraft, ScheduleRepository};

/// Window a caller asks a schedule for.
///
/// Both bounds are accepted and logged but do not bound the computed week:
/// every run covers the seven days starting today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWindow {
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

/// A stored schedule together with the slots it could not staff.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSchedule {
    pub schedule: Schedule,
    pub unfilled: Vec<Shortfall>,
}

/// Generates schedules from the nurse store and requirement catalog.
///
/// The scheduler itself does not serialize runs; two overlapping calls read
/// independent snapshots and store two schedules.
#[derive(Clone)]
pub struct Scheduler {
    nurses: Arc<dyn NurseRepository>,
    requirements: Arc<dyn RequirementSource>,
    schedules: Arc<dyn ScheduleRepository>,
}

impl Scheduler {
    pub fn new(
        nurses: Arc<dyn NurseRepository>,
        requirements: Arc<dyn RequirementSource>,
        schedules: Arc<dyn ScheduleRepository>,
    ) -> Self {
        Self {
            nurses,
            requirements,
            schedules,
        }
    }

    /// Generates and stores this week's schedule using local time and the
    /// thread-local random generator.
    pub fn generate_schedule(&self, window: ScheduleWindow) -> Result<GeneratedSchedule> {
        let today = Local::now().date_naive();
        self.generate_schedule_with(window, today, &mut rand::thread_rng())
    }

    /// Generates and stores the week starting at `today`, drawing the
    /// fallback assignments from `rng`.
    pub fn generate_schedule_with<R: Rng + ?Sized>(
        &self,
        window: ScheduleWindow,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<GeneratedSchedule> {
        let start = Instant::now();
        let nurses = self.nurses.list_nurses()?;
        let requirements = self.requirements.list_shift_requirements()?;

        info!(
            nurses = nurses.len(),
            requirements = requirements.len(),
            %today,
            start_date = ?window.start_date,
            end_date = ?window.end_date,
            "Generating schedule"
        );

        let plan = build_week(&nurses, &requirements, today, rng);
        let schedule = self.schedules.save_schedule(ScheduleDraft {
            shifts: plan.shifts,
        })?;

        info!(
            schedule_id = %schedule.id,
            shifts = schedule.shifts.len(),
            unfilled = plan.unfilled.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Schedule generated"
        );

        Ok(GeneratedSchedule {
            schedule,
            unfilled: plan.unfilled,
        })
    }
}
