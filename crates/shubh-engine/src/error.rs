//! Error types for shubh-engine operations.

use thiserror::Error;

use crate::sun::SunTimeError;

#[derive(Error, Debug)]
pub enum ShubhError {
    #[error("Sun time computation failed: {0}")]
    SunTimeComputationFailed(#[from] SunTimeError),

    #[error("Clock inconsistency: {0}")]
    ClockInconsistency(String),

    #[error("No auspicious slot found: {0}")]
    NoAuspiciousSlotFound(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ShubhError>;
