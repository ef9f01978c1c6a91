use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    Router,
    routing::{get, post},
};
use kondate_menu::CalendarStore;
use kondate_recipe::CatalogSource;
use time::{Date, OffsetDateTime};
use time_tz::{ToTimezone, timezones};

use crate::{config::Config, solver::MenuSolver};

mod calendar;
mod health;
mod plan;
mod recipes;

pub use plan::{GenerationStatus, GenerationTracker, PeriodSummary, PlanSummary};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub calendar: Arc<RwLock<CalendarStore>>,
    pub tracker: Arc<Mutex<GenerationTracker>>,
    pub solver: Arc<dyn MenuSolver>,
    pub catalog: Arc<dyn CatalogSource>,
}

impl AppState {
    pub fn new(
        config: Config,
        solver: Arc<dyn MenuSolver>,
        catalog: Arc<dyn CatalogSource>,
    ) -> Self {
        Self {
            config,
            calendar: Arc::new(RwLock::new(CalendarStore::default())),
            tracker: Arc::new(Mutex::new(GenerationTracker::default())),
            solver,
            catalog,
        }
    }

    /// Today in the configured timezone, falling back to UTC when the
    /// zone name does not resolve.
    pub(crate) fn today(&self) -> Date {
        let now = OffsetDateTime::now_utc();
        match timezones::get_by_name(&self.config.server.timezone) {
            Some(tz) => now.to_timezone(tz).date(),
            None => now.date(),
        }
    }

    // Locks guard short synchronous sections and are never held across
    // an await.
    pub(crate) fn calendar_read(&self) -> RwLockReadGuard<'_, CalendarStore> {
        self.calendar.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn calendar_write(&self) -> RwLockWriteGuard<'_, CalendarStore> {
        self.calendar.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn tracker_lock(&self) -> MutexGuard<'_, GenerationTracker> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/plan/options", get(plan::options))
        .route("/api/plan", post(plan::generate))
        .route("/api/plan/status", get(plan::status))
        .route("/api/calendar/{year}/{month}", get(calendar::month))
        .route("/api/recipes", get(recipes::index))
        .route("/api/recipes/{menu_id}", get(recipes::detail))
        .with_state(app_state)
}
