//! # shubh-engine
//!
//! Chowgadhiya computation: which of the eight sunrise-anchored periods of
//! the day or night an instant falls in, whether that period is auspicious,
//! and when the next auspicious one begins.
//!
//! All operations take the instant to evaluate as an explicit argument. The
//! engine never reads the system clock or the environment on its own.
//!
//! ## Modules
//!
//! - [`period`]: Period kinds, phases and the weekday rotation table
//! - [`sun`]: Sunrise/sunset providers (Solar Position Algorithm, fixed times)
//! - [`vedic_day`]: Sunrise → sunset → next sunrise boundaries for an instant
//! - [`locator`]: Current period and per-phase schedules
//! - [`evaluator`]: The composed evaluation and its serialisable output
//! - [`config`]: Observer location and environment settings
//! - [`log`]: Injected debug logging
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod evaluator;
pub mod locator;
pub mod log;
pub mod period;
pub mod sun;
pub mod vedic_day;

pub use config::{Location, Settings, DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
pub use error::ShubhError;
pub use evaluator::{Evaluation, ShubhEvaluator};
pub use locator::{locate, schedule_from, PeriodPosition, PhaseSchedule, Slot};
pub use log::{debug_log, DebugLog, Quiet, Verbose};
pub use period::{classify, lookup, PeriodKind, Phase};
pub use sun::{
    fold_utc_offset, FixedSunTimes, SpaSunTimes, SunTimeError, SunTimeProvider, SunTimes,
};
pub use vedic_day::{PhaseSpan, VedicDay, VedicDayResolver};
