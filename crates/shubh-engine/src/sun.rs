//! Sunrise and sunset times of day.
//!
//! The rest of the engine consumes sun times through [`SunTimeProvider`] as a
//! pure function of date, location and UTC offset. Two providers ship here:
//!
//! - [`SpaSunTimes`]: the NREL Solar Position Algorithm via `solar_positioning`
//! - [`FixedSunTimes`]: the same times for every date, for tests and offline use
//!
//! Providers return local times of day only. Placing them on a calendar date
//! in the caller's timezone is the job of [`crate::vedic_day`].

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;
use solar_positioning::{spa, Horizon, SunriseResult};
use thiserror::Error;

/// Seconds in a civil day.
const SECONDS_PER_DAY: i64 = 86_400;

/// Local sunrise and sunset for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SunTimes {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SunTimeError {
    #[error("latitude {0} outside [-90, 90]")]
    InvalidLatitude(f64),

    #[error("longitude {0} outside [-180, 180]")]
    InvalidLongitude(f64),

    #[error("UTC offset {0}h outside [-12, 14]")]
    InvalidUtcOffset(f64),

    #[error("the sun does not rise or set on {date} at latitude {latitude}")]
    NoSunriseOrSunset { date: NaiveDate, latitude: f64 },

    #[error("{0}")]
    Other(String),
}

/// Source of sunrise/sunset times of day.
///
/// `utc_offset_hours` is the local offset to express the result in, already
/// folded by [`fold_utc_offset`].
pub trait SunTimeProvider {
    fn sun_times(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        utc_offset_hours: f64,
    ) -> Result<SunTimes, SunTimeError>;
}

impl<P: SunTimeProvider + ?Sized> SunTimeProvider for &P {
    fn sun_times(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        utc_offset_hours: f64,
    ) -> Result<SunTimes, SunTimeError> {
        (**self).sun_times(date, latitude, longitude, utc_offset_hours)
    }
}

/// Convert a UTC offset in seconds to fractional hours for a [`SunTimeProvider`].
///
/// Offsets above twelve hours are folded as `12 - hours`, so `+13:00` becomes
/// `-1.0`. This reproduces the long-standing behaviour of the service even
/// though it is astronomically off for those zones.
pub fn fold_utc_offset(offset_seconds: i32) -> f64 {
    let hours = offset_seconds as f64 / 3600.0;
    if hours > 12.0 {
        12.0 - hours
    } else {
        hours
    }
}

// ── SPA provider ────────────────────────────────────────────────────────────

/// ΔT (TT − UT) in seconds used for every date.
const DELTA_T_SECONDS: f64 = 69.0;

/// Sunrise/sunset from the NREL Solar Position Algorithm.
///
/// Times are for the standard horizon (upper limb, -0.833° with refraction),
/// computed for the UTC day matching the local date and shifted by the
/// offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaSunTimes;

impl SunTimeProvider for SpaSunTimes {
    fn sun_times(
        &self,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        utc_offset_hours: f64,
    ) -> Result<SunTimes, SunTimeError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(SunTimeError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(SunTimeError::InvalidLongitude(longitude));
        }
        if !(-12.0..=14.0).contains(&utc_offset_hours) {
            return Err(SunTimeError::InvalidUtcOffset(utc_offset_hours));
        }

        let result = spa::sunrise_sunset_utc_for_horizon(
            date.year(),
            date.month(),
            date.day(),
            latitude,
            longitude,
            DELTA_T_SECONDS,
            Horizon::SunriseSunset,
        )
        .map_err(|e| SunTimeError::Other(e.to_string()))?;

        match result {
            SunriseResult::RegularDay {
                sunrise, sunset, ..
            } => Ok(SunTimes {
                sunrise: time_of_day_from_minutes((sunrise.hours() + utc_offset_hours) * 60.0)?,
                sunset: time_of_day_from_minutes((sunset.hours() + utc_offset_hours) * 60.0)?,
            }),
            SunriseResult::AllDay { .. } | SunriseResult::AllNight { .. } => {
                Err(SunTimeError::NoSunriseOrSunset { date, latitude })
            }
        }
    }
}

/// Minutes after midnight (possibly outside one day) to a whole-second time of day.
fn time_of_day_from_minutes(minutes: f64) -> Result<NaiveTime, SunTimeError> {
    if !minutes.is_finite() {
        return Err(SunTimeError::Other(format!(
            "non-finite time of day: {minutes}"
        )));
    }
    let seconds = ((minutes * 60.0).round() as i64).rem_euclid(SECONDS_PER_DAY);
    NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0)
        .ok_or_else(|| SunTimeError::Other(format!("time of day out of range: {seconds}s")))
}

// ── Fixed provider ──────────────────────────────────────────────────────────

/// Returns the same sunrise and sunset for every date and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSunTimes(pub SunTimes);

impl FixedSunTimes {
    pub fn new(sunrise: NaiveTime, sunset: NaiveTime) -> Self {
        Self(SunTimes { sunrise, sunset })
    }
}

impl SunTimeProvider for FixedSunTimes {
    fn sun_times(
        &self,
        _date: NaiveDate,
        _latitude: f64,
        _longitude: f64,
        _utc_offset_hours: f64,
    ) -> Result<SunTimes, SunTimeError> {
        Ok(self.0)
    }
}
