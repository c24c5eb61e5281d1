//! Application state for the HTTP server.

use std::sync::Arc;

use chrono_tz::Tz;
use shubh_engine::{ShubhEvaluator, SpaSunTimes};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<ShubhEvaluator<SpaSunTimes>>,
    /// Zone "now" is taken in; `None` means the system local zone.
    pub timezone: Option<Tz>,
}

impl AppState {
    pub fn new(evaluator: ShubhEvaluator<SpaSunTimes>, timezone: Option<Tz>) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            timezone,
        }
    }
}
