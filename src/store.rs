//! Nurse preference store and schedule persistence.
//!
//! The scheduler only reads nurses and writes schedules through the two
//! repository traits; [`InMemoryStore`] is the process-local implementation
//! used by the server and the tests.

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{AssignedShift, Nurse, NurseId, Preference, Schedule};
use crate::error::{Result, ScheduleError};

/// Shifts of a schedule that has not been stored yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub shifts: Vec<AssignedShift>,
}

/// Read access to nurses and write access to their preferences.
pub trait NurseRepository: Send + Sync {
    /// Returns all nurses in a stable order (ascending id).
    fn list_nurses(&self) -> Result<Vec<Nurse>>;

    fn get_nurse(&self, id: NurseId) -> Result<Nurse>;

    /// Replaces the nurse's whole preference list.
    fn set_preferences(&self, id: NurseId, preferences: Vec<Preference>) -> Result<Nurse>;
}

/// Creation and lookup of stored schedules.
pub trait ScheduleRepository: Send + Sync {
    /// Stores a new schedule, assigning its identity and timestamps.
    fn save_schedule(&self, draft: ScheduleDraft) -> Result<Schedule>;

    fn list_schedules(&self) -> Result<Vec<Schedule>>;

    fn get_schedule(&self, id: Uuid) -> Result<Schedule>;

    /// Every shift across every stored schedule.
    fn all_shifts(&self) -> Result<Vec<AssignedShift>> {
        Ok(self
            .list_schedules()?
            .into_iter()
            .flat_map(|s| s.shifts)
            .collect())
    }

    fn shifts_by_nurse(&self, nurse_id: NurseId) -> Result<Vec<AssignedShift>> {
        let mut shifts = self.all_shifts()?;
        shifts.retain(|s| s.nurse_id == nurse_id);
        Ok(shifts)
    }

    fn shifts_by_schedule(&self, schedule_id: Uuid) -> Result<Vec<AssignedShift>> {
        Ok(self.get_schedule(schedule_id)?.shifts)
    }
}

/// Thread-safe in-memory store of nurses and schedules.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    nurses: RwLock<Vec<Nurse>>,
    schedules: RwLock<Vec<Schedule>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given nurses.
    ///
    /// Nurses are kept sorted by id; a later nurse with a duplicate id
    /// replaces the earlier one.
    pub fn with_nurses(nurses: Vec<Nurse>) -> Self {
        let store = Self::new();
        for nurse in nurses {
            store.upsert_nurse(nurse);
        }
        store
    }

    /// Inserts a nurse or replaces the one with the same id.
    pub fn upsert_nurse(&self, nurse: Nurse) {
        let mut nurses = self.nurses.write();
        match nurses.binary_search_by_key(&nurse.id, |n| n.id) {
            Ok(pos) => nurses[pos] = nurse,
            Err(pos) => nurses.insert(pos, nurse),
        }
    }
}

impl NurseRepository for InMemoryStore {
    fn list_nurses(&self) -> Result<Vec<Nurse>> {
        Ok(self.nurses.read().clone())
    }

    fn get_nurse(&self, id: NurseId) -> Result<Nurse> {
        self.nurses
            .read()
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(ScheduleError::NurseNotFound(id))
    }

    fn set_preferences(&self, id: NurseId, preferences: Vec<Preference>) -> Result<Nurse> {
        let mut nurses = self.nurses.write();
        let nurse = nurses
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(ScheduleError::NurseNotFound(id))?;
        debug!(nurse_id = id, count = preferences.len(), "Setting nurse preferences");
        nurse.preferences = preferences;
        Ok(nurse.clone())
    }
}

impl ScheduleRepository for InMemoryStore {
    fn save_schedule(&self, draft: ScheduleDraft) -> Result<Schedule> {
        let now = Utc::now();
        let schedule = Schedule {
            id: Uuid::new_v4(),
            shifts: draft.shifts,
            created: now,
            updated: now,
        };
        info!(schedule_id = %schedule.id, shifts = schedule.shifts.len(), "Saved schedule");
        self.schedules.write().push(schedule.clone());
        Ok(schedule)
    }

    fn list_schedules(&self) -> Result<Vec<Schedule>> {
        Ok(self.schedules.read().clone())
    }

    fn get_schedule(&self, id: Uuid) -> Result<Schedule> {
        self.schedules
            .read()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(ScheduleError::ScheduleNotFound(id))
    }
}
