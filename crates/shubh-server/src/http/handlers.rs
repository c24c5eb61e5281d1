//! HTTP handlers for the REST API.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use shubh_engine::Evaluation;

use super::error::AppError;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EvaluateQuery {
    /// RFC 3339 instant to evaluate instead of the current time.
    pub at: Option<String>,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /chowgadhiya
///
/// Evaluate the current instant in the configured zone, or `?at=` when given.
/// An explicit `at` is converted into the configured zone when one is set and
/// otherwise keeps its own offset.
pub async fn chowgadhiya(
    State(state): State<AppState>,
    Query(query): Query<EvaluateQuery>,
) -> HandlerResult<Evaluation> {
    let evaluator = state.evaluator.as_ref();

    let evaluation = match (query.at.as_deref(), state.timezone) {
        (Some(raw), tz) => {
            let at = DateTime::parse_from_rfc3339(raw.trim())
                .map_err(|e| AppError::BadRequest(format!("at '{raw}': {e}")))?;
            match tz {
                Some(tz) => evaluator.evaluate(&at.with_timezone(&tz))?,
                None => evaluator.evaluate(&at)?,
            }
        }
        (None, Some(tz)) => evaluator.evaluate(&Utc::now().with_timezone(&tz))?,
        (None, None) => evaluator.evaluate(&Local::now())?,
    };

    tracing::debug!(
        period = %evaluation.current_period_name,
        auspicious = evaluation.is_auspicious,
        "evaluated"
    );
    Ok(Json(evaluation))
}
