//! Debug logging handed to the evaluator.
//!
//! The evaluator never consults the environment to decide whether to log.
//! Callers pick a [`DebugLog`] once at start-up (usually through
//! [`debug_log`]) and pass it in.

use std::fmt;

/// Sink for the evaluator's step-by-step trace.
pub trait DebugLog: Send + Sync {
    fn debug(&self, message: fmt::Arguments<'_>);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quiet;

impl DebugLog for Quiet {
    fn debug(&self, _message: fmt::Arguments<'_>) {}
}

/// Forwards every message as a `tracing` debug event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbose;

impl DebugLog for Verbose {
    fn debug(&self, message: fmt::Arguments<'_>) {
        tracing::debug!(target: "shubh_engine", "{}", message);
    }
}

/// [`Verbose`] when `enabled`, [`Quiet`] otherwise.
pub fn debug_log(enabled: bool) -> Box<dyn DebugLog> {
    if enabled {
        Box::new(Verbose)
    } else {
        Box::new(Quiet)
    }
}
