//! REST API handlers for Nurse Scheduling.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use crate::catalog::{RequirementCatalog, RequirementSource};
use crate::demo_data::{self, DemoData};
use crate::domain::{NurseId, ShiftRequirement};
use crate::dto::{
    GeneratedScheduleDto, HealthResponse, InfoResponse, NurseDto, ScheduleDto,
    SetPreferencesRequest, ShiftDto,
};
use crate::error::ScheduleError;
use crate::scheduler::{Scheduler, ScheduleWindow};
use crate::store::{InMemoryStore, NurseRepository, ScheduleRepository};

/// Application state shared across handlers.
pub struct AppState {
    store: Arc<InMemoryStore>,
    catalog: Arc<RequirementCatalog>,
    scheduler: Scheduler,
    /// Held for the whole of a scheduling run: one run at a time.
    run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(store: Arc<InMemoryStore>, catalog: RequirementCatalog) -> Self {
        let catalog = Arc::new(catalog);
        let scheduler = Scheduler::new(store.clone(), catalog.clone(), store.clone());
        Self {
            store,
            catalog,
            scheduler,
            run_lock: Mutex::new(()),
        }
    }
}

impl IntoResponse for ScheduleError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ScheduleError::InvalidWeekday(_) => (StatusCode::BAD_REQUEST, "INVALID_WEEKDAY"),
            ScheduleError::UnknownShiftType(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_SHIFT_TYPE"),
            ScheduleError::NurseNotFound(_) | ScheduleError::ScheduleNotFound(_) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            ScheduleError::Io(_) | ScheduleError::Json(_) => {
                error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        });

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Router and Handlers
// ============================================================================

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{id}", get(get_demo_data))
        // Nurses
        .route("/nurses", get(list_nurses))
        .route("/nurses/preferences", post(set_preferences))
        .route("/nurses/{id}", get(get_nurse))
        // Shifts
        .route("/shifts", get(list_shifts))
        .route("/shifts/requirements", get(get_requirements))
        .route("/shifts/nurse/{id}", get(shifts_by_nurse))
        .route("/shifts/schedule/{id}", get(shifts_by_schedule))
        // Schedules
        .route("/schedules", post(create_schedule))
        .route("/schedules", get(list_schedules))
        .route("/schedules/{id}", get(get_schedule))
        .with_state(state)
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// GET /info - Application info endpoint.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Nurse Scheduling",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/{id} - Get a specific demo roster.
async fn get_demo_data(Path(id): Path<String>) -> Result<Json<Vec<NurseDto>>, StatusCode> {
    match id.parse::<DemoData>() {
        Ok(demo) => {
            let nurses = demo_data::generate(demo);
            Ok(Json(nurses.iter().map(NurseDto::from).collect()))
        }
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

/// GET /nurses
async fn list_nurses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NurseDto>>, ScheduleError> {
    let nurses = state.store.list_nurses()?;
    Ok(Json(nurses.iter().map(NurseDto::from).collect()))
}

/// GET /nurses/{id}
async fn get_nurse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<NurseId>,
) -> Result<Json<NurseDto>, ScheduleError> {
    let nurse = state.store.get_nurse(id)?;
    Ok(Json(NurseDto::from(&nurse)))
}

/// POST /nurses/preferences - Replace a nurse's preferences.
async fn set_preferences(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetPreferencesRequest>,
) -> Result<Json<NurseDto>, ScheduleError> {
    let preferences = request.to_preferences()?;
    let nurse = state.store.set_preferences(request.id, preferences)?;
    Ok(Json(NurseDto::from(&nurse)))
}

/// GET /shifts - Every shift across all stored schedules.
async fn list_shifts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShiftDto>>, ScheduleError> {
    let shifts = state.store.all_shifts()?;
    Ok(Json(shifts.iter().map(ShiftDto::from).collect()))
}

/// GET /shifts/requirements - The requirement catalog.
async fn get_requirements(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ShiftRequirement>>, ScheduleError> {
    Ok(Json(state.catalog.list_shift_requirements()?))
}

/// GET /shifts/nurse/{id}
async fn shifts_by_nurse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<NurseId>,
) -> Result<Json<Vec<ShiftDto>>, ScheduleError> {
    let shifts = state.store.shifts_by_nurse(id)?;
    Ok(Json(shifts.iter().map(ShiftDto::from).collect()))
}

/// GET /shifts/schedule/{id}
async fn shifts_by_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ShiftDto>>, ScheduleError> {
    let shifts = state.store.shifts_by_schedule(id)?;
    Ok(Json(shifts.iter().map(ShiftDto::from).collect()))
}

/// POST /schedules - Generate and store this week's schedule.
async fn create_schedule(
    State(state): State<Arc<AppState>>,
    Json(window): Json<ScheduleWindow>,
) -> Result<(StatusCode, Json<GeneratedScheduleDto>), ScheduleError> {
    let generated = run_scheduler(&state, window)?;
    Ok((StatusCode::CREATED, Json(generated)))
}

fn run_scheduler(
    state: &AppState,
    window: ScheduleWindow,
) -> Result<GeneratedScheduleDto, ScheduleError> {
    let _guard = state.run_lock.lock();
    let generated = state.scheduler.generate_schedule(window)?;
    Ok(GeneratedScheduleDto::from(&generated))
}

/// GET /schedules
async fn list_schedules(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ScheduleDto>>, ScheduleError> {
    let schedules = state.store.list_schedules()?;
    Ok(Json(schedules.iter().map(ScheduleDto::from).collect()))
}

/// GET /schedules/{id}
async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScheduleDto>, ScheduleError> {
    let schedule = state.store.get_schedule(id)?;
    Ok(Json(ScheduleDto::from(&schedule)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayOfWeek;
    use crate::domain::{Nurse, Preference, ShiftType};
    use crate::dto::PreferenceDto;

    fn state() -> Arc<AppState> {
        let store = Arc::new(InMemoryStore::with_nurses(vec![
            Nurse::new(1, "Amy Cole").with_preferences([Preference::new(
                DayOfWeek::Monday,
                ShiftType::Day,
            )]),
            Nurse::new(2, "Beth Fox"),
        ]));
        let catalog = RequirementCatalog::new(vec![
            ShiftRequirement::new(ShiftType::Day, DayOfWeek::Monday, 1),
            ShiftRequirement::new(ShiftType::Night, DayOfWeek::Tuesday, 1),
        ]);
        Arc::new(AppState::new(store, catalog))
    }

    #[tokio::test]
    async fn test_create_and_fetch_schedule() {
        let state = state();

        let (status, Json(created)) =
            create_schedule(State(state.clone()), Json(ScheduleWindow::default()))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.schedule.shifts.len(), 2);
        assert!(created.unfilled.is_empty());

        let Json(fetched) = get_schedule(State(state.clone()), Path(created.schedule.id))
            .await
            .unwrap();
        assert_eq!(fetched.id, created.schedule.id);

        let Json(listed) = list_schedules(State(state.clone())).await.unwrap();
        assert_eq!(listed.len(), 1);

        let Json(by_schedule) = shifts_by_schedule(State(state.clone()), Path(created.schedule.id))
            .await
            .unwrap();
        assert_eq!(by_schedule.len(), 2);

        let Json(by_nurse) = shifts_by_nurse(State(state), Path(2)).await.unwrap();
        assert_eq!(by_nurse.len(), 1);
        assert_eq!(by_nurse[0].shift_type, "night");
    }

    #[tokio::test]
    async fn test_set_preferences() {
        let state = state();
        let request = SetPreferencesRequest {
            id: 2,
            preferences: vec![PreferenceDto {
                day: "Friday".to_string(),
                shift: "night".to_string(),
            }],
        };

        let Json(nurse) = set_preferences(State(state.clone()), Json(request))
            .await
            .unwrap();
        assert_eq!(nurse.preferences.len(), 1);

        let Json(nurse) = get_nurse(State(state), Path(2)).await.unwrap();
        assert_eq!(nurse.preferences[0].day, "Friday");
    }

    #[tokio::test]
    async fn test_invalid_weekday_is_bad_request() {
        let request = SetPreferencesRequest {
            id: 1,
            preferences: vec![PreferenceDto {
                day: "Someday".to_string(),
                shift: "day".to_string(),
            }],
        };

        let err = set_preferences(State(state()), Json(request)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let state = state();

        let err = get_nurse(State(state.clone()), Path(99)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = get_schedule(State(state), Path(Uuid::new_v4())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_requirements_and_demo_data() {
        let Json(reqs) = get_requirements(State(state())).await.unwrap();
        assert_eq!(reqs.len(), 2);

        let Json(nurses) = get_demo_data(Path("small".to_string())).await.unwrap();
        assert_eq!(nurses.len(), 15);
        assert_eq!(
            get_demo_data(Path("huge".to_string())).await.unwrap_err(),
            StatusCode::NOT_FOUND
        );
    }
}
