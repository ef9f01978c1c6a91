use axum::{Json, extract::State};
use kondate_menu::{PeriodKind, PeriodOption, PeriodSelector, ResolvedPeriod, upcoming_periods};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::Validate;

use super::AppState;
use crate::error::AppError;
use crate::solver::{SolverRequest, batch_from_plan};

#[derive(
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Processing,
    Succeeded,
    Failed,
}

/// Remembers the state of the most recent generation run. One run at a
/// time; the calendar store itself never sees concurrent writers.
#[derive(Debug, Default, Clone, Serialize)]
pub struct GenerationTracker {
    pub status: GenerationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_plan: Option<PlanSummary>,
}

impl GenerationTracker {
    /// Returns false when a run is already in flight.
    fn begin(&mut self) -> bool {
        if self.status == GenerationStatus::Processing {
            return false;
        }
        self.status = GenerationStatus::Processing;
        true
    }

    fn succeed(&mut self, summary: PlanSummary) {
        self.status = GenerationStatus::Succeeded;
        self.last_error = None;
        self.last_plan = Some(summary);
    }

    fn fail(&mut self, message: String) {
        self.status = GenerationStatus::Failed;
        self.last_error = Some(message);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub kind: PeriodKind,
    pub year: i32,
    pub month: u8,
    pub start_day: u8,
    pub day_count: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_index: Option<u8>,
}

impl From<&ResolvedPeriod> for PeriodSummary {
    fn from(period: &ResolvedPeriod) -> Self {
        Self {
            kind: period.kind,
            year: period.start.year(),
            month: u8::from(period.start.month()),
            start_day: period.start.day(),
            day_count: period.day_count,
            week_index: period.week_index,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub period: PeriodSummary,
    pub merged_days: usize,
    pub total_cost: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlanRequest {
    pub period: String,
    /// Cost target in yen for the whole period. Falls back to the
    /// configured default when omitted.
    #[validate(range(min = 1.0, max = 100_000.0))]
    pub target_cost: Option<f64>,
}

/// Marks the tracker Processing for the lifetime of one generation run.
/// Dropping without an explicit outcome records a failure, so an
/// interrupted request can never wedge the tracker.
struct ProcessingGuard {
    state: AppState,
    armed: bool,
}

impl ProcessingGuard {
    fn acquire(state: &AppState) -> Result<Self, AppError> {
        if !state.tracker_lock().begin() {
            return Err(AppError::GenerationInProgress);
        }
        Ok(Self {
            state: state.clone(),
            armed: true,
        })
    }

    fn succeed(mut self, summary: PlanSummary) {
        self.state.tracker_lock().succeed(summary);
        self.armed = false;
    }

    fn fail(mut self, message: String) {
        self.state.tracker_lock().fail(message);
        self.armed = false;
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        if self.armed {
            self.state
                .tracker_lock()
                .fail("献立の生成に失敗しました".to_string());
        }
    }
}

/// POST /api/plan
#[tracing::instrument(skip(state, request))]
pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanSummary>, AppError> {
    request
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let period = PeriodSelector::parse(&request.period)?.resolve()?;
    let target_cost = request
        .target_cost
        .unwrap_or(state.config.solver.default_target_cost);

    let guard = ProcessingGuard::acquire(&state)?;

    let solver_request = SolverRequest {
        days: u32::from(period.day_count),
        cost: target_cost,
        target_year_month: period.target_year_month(),
        target_week: period.week_index,
    };

    tracing::info!(
        period = %request.period,
        days = solver_request.days,
        cost = target_cost,
        "starting menu generation"
    );

    let started = std::time::Instant::now();
    let response = match state.solver.optimize(&solver_request).await {
        Ok(response) => response,
        Err(e) => {
            guard.fail(e.user_message());
            return Err(AppError::Solver(e));
        }
    };
    let solver_ms = started.elapsed().as_millis() as u64;

    let (batch, total_cost) = batch_from_plan(response.plan);
    let merged_days = state
        .calendar_write()
        .merge(&period, batch, period.slot_limit());

    let summary = PlanSummary {
        period: PeriodSummary::from(&period),
        merged_days,
        total_cost,
    };
    guard.succeed(summary.clone());

    tracing::info!(merged_days, total_cost, solver_ms, "menu generation finished");

    Ok(Json(summary))
}

/// GET /api/plan/status
pub async fn status(State(state): State<AppState>) -> Json<GenerationTracker> {
    Json(state.tracker_lock().clone())
}

/// GET /api/plan/options
pub async fn options(State(state): State<AppState>) -> Json<Vec<PeriodOption>> {
    Json(upcoming_periods(state.today()))
}
