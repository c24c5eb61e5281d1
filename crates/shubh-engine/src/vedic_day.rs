//! Vedic day boundaries: sunrise → sunset → next sunrise.
//!
//! A Vedic day starts at local sunrise, not at midnight. An instant between
//! midnight and sunrise still belongs to the previous calendar day's Vedic
//! day, and its rotation row is keyed by that earlier sunrise's weekday.
//!
//! All boundaries are expressed in the caller's timezone: the provider gives
//! times of day, and the resolver places them on the right local date.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Offset, TimeZone, TimeDelta, Weekday};

use crate::config::Location;
use crate::error::{Result, ShubhError};
use crate::log::DebugLog;
use crate::period::{self, Phase, PeriodKind, PERIODS_PER_PHASE};
use crate::sun::{fold_utc_offset, SunTimeProvider};

/// The three boundary instants of one Vedic day.
#[derive(Debug, Clone)]
pub struct VedicDay<Tz: TimeZone> {
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
    pub next_sunrise: DateTime<Tz>,
}

impl<Tz: TimeZone> VedicDay<Tz> {
    /// Weekday of the sunrise; selects the rotation rows for both phases.
    pub fn weekday(&self) -> Weekday {
        self.sunrise.weekday()
    }

    /// Whether `now` falls in `[sunrise, next_sunrise)`.
    pub fn contains(&self, now: &DateTime<Tz>) -> bool {
        self.sunrise <= *now && *now < self.next_sunrise
    }

    pub fn day(&self) -> PhaseSpan<Tz> {
        PhaseSpan {
            phase: Phase::Day,
            weekday: self.weekday(),
            start: self.sunrise.clone(),
            end: self.sunset.clone(),
        }
    }

    pub fn night(&self) -> PhaseSpan<Tz> {
        PhaseSpan {
            phase: Phase::Night,
            weekday: self.weekday(),
            start: self.sunset.clone(),
            end: self.next_sunrise.clone(),
        }
    }

    /// The phase containing `now`. Day is half-open, so sunset itself is night.
    pub fn span_at(&self, now: &DateTime<Tz>) -> PhaseSpan<Tz> {
        if *now < self.sunset {
            self.day()
        } else {
            self.night()
        }
    }

    fn check(&self, now: &DateTime<Tz>) -> Result<()> {
        if !(self.sunrise < self.sunset && self.sunset < self.next_sunrise) {
            return Err(ShubhError::ClockInconsistency(format!(
                "boundaries out of order: sunrise {}, sunset {}, next sunrise {}",
                self.sunrise.to_rfc3339(),
                self.sunset.to_rfc3339(),
                self.next_sunrise.to_rfc3339()
            )));
        }
        if !self.contains(now) {
            return Err(ShubhError::ClockInconsistency(format!(
                "{} is outside the Vedic day {} .. {}",
                now.to_rfc3339(),
                self.sunrise.to_rfc3339(),
                self.next_sunrise.to_rfc3339()
            )));
        }
        Ok(())
    }
}

// ── PhaseSpan ───────────────────────────────────────────────────────────────

/// One phase of a Vedic day, divided into eight equal periods.
#[derive(Debug, Clone)]
pub struct PhaseSpan<Tz: TimeZone> {
    pub phase: Phase,
    /// Weekday of the Vedic sunrise this phase belongs to.
    pub weekday: Weekday,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> PhaseSpan<Tz> {
    /// Length of one period in (fractional) seconds.
    pub fn period_seconds(&self) -> f64 {
        seconds_between(&self.start, &self.end) / PERIODS_PER_PHASE as f64
    }

    /// The rotation row for this phase.
    pub fn kinds(&self) -> &'static [PeriodKind; PERIODS_PER_PHASE] {
        period::lookup(self.phase, self.weekday)
    }

    /// Start instant of the period at `index`.
    pub fn period_start(&self, index: usize) -> DateTime<Tz> {
        let offset_ns = (index as f64 * self.period_seconds() * 1e9).round() as i64;
        self.start.clone() + TimeDelta::nanoseconds(offset_ns)
    }
}

/// Signed seconds from `from` to `to`.
pub(crate) fn seconds_between<Tz: TimeZone>(from: &DateTime<Tz>, to: &DateTime<Tz>) -> f64 {
    let delta = to.clone() - from.clone();
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 1e9,
        None => delta.num_seconds() as f64,
    }
}

// ── VedicDayResolver ────────────────────────────────────────────────────────

/// Derives [`VedicDay`] boundaries from a [`SunTimeProvider`].
pub struct VedicDayResolver<'a, P: SunTimeProvider + ?Sized> {
    location: Location,
    provider: &'a P,
    log: &'a dyn DebugLog,
}

impl<'a, P: SunTimeProvider + ?Sized> VedicDayResolver<'a, P> {
    pub fn new(location: Location, provider: &'a P, log: &'a dyn DebugLog) -> Self {
        Self {
            location,
            provider,
            log,
        }
    }

    /// The Vedic day containing `now`.
    ///
    /// # Errors
    ///
    /// - [`ShubhError::SunTimeComputationFailed`] when the provider fails
    /// - [`ShubhError::InvalidDatetime`] when a boundary lands in a DST gap
    /// - [`ShubhError::ClockInconsistency`] when the boundaries do not satisfy
    ///   `sunrise < sunset < next_sunrise` and `sunrise <= now < next_sunrise`
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<VedicDay<Tz>> {
        let tz = now.timezone();
        let today = now.date_naive();
        let now_offset = now.offset().fix().local_minus_utc();

        let (sunrise, sunset) = self.sun_on(&tz, today, now_offset)?;

        let day = if *now < sunrise {
            self.log
                .debug(format_args!("sun is not yet up, using the previous Vedic day"));
            let yesterday = today.pred_opt().ok_or_else(|| {
                ShubhError::InvalidDatetime(format!("no calendar day before {today}"))
            })?;
            let offset = offset_at_midnight(&tz, yesterday).unwrap_or(now_offset);
            let (prev_sunrise, prev_sunset) = self.sun_on(&tz, yesterday, offset)?;
            VedicDay {
                sunrise: prev_sunrise,
                sunset: prev_sunset,
                next_sunrise: sunrise,
            }
        } else {
            self.log.debug(format_args!("sun is up"));
            let tomorrow = today.succ_opt().ok_or_else(|| {
                ShubhError::InvalidDatetime(format!("no calendar day after {today}"))
            })?;
            let offset = offset_at_midnight(&tz, tomorrow).unwrap_or(now_offset);
            let (next_sunrise, _) = self.sun_on(&tz, tomorrow, offset)?;
            VedicDay {
                sunrise,
                sunset,
                next_sunrise,
            }
        };

        self.log.debug(format_args!("now: {}", now.to_rfc3339()));
        self.log.debug(format_args!("sunrise: {}", day.sunrise.to_rfc3339()));
        self.log.debug(format_args!("sunset: {}", day.sunset.to_rfc3339()));
        self.log
            .debug(format_args!("next sunrise: {}", day.next_sunrise.to_rfc3339()));

        day.check(now)?;
        Ok(day)
    }

    /// Day phase of the Vedic day that follows `day`.
    ///
    /// Runs from `day.next_sunrise` to the sunset on that sunrise's local
    /// date, keyed by that date's weekday.
    pub fn following_day<Tz: TimeZone>(&self, day: &VedicDay<Tz>) -> Result<PhaseSpan<Tz>> {
        let tz = day.next_sunrise.timezone();
        let date = day.next_sunrise.date_naive();
        let offset = day.next_sunrise.offset().fix().local_minus_utc();
        let (_, sunset) = self.sun_on(&tz, date, offset)?;

        if sunset <= day.next_sunrise {
            return Err(ShubhError::ClockInconsistency(format!(
                "sunset {} does not follow sunrise {}",
                sunset.to_rfc3339(),
                day.next_sunrise.to_rfc3339()
            )));
        }

        Ok(PhaseSpan {
            phase: Phase::Day,
            weekday: day.next_sunrise.weekday(),
            start: day.next_sunrise.clone(),
            end: sunset,
        })
    }

    /// Sunrise on `date` and the sunset that follows it, in `tz`.
    ///
    /// A sunset whose time of day is not after the sunrise falls past local
    /// midnight and is placed on the next date.
    fn sun_on<Tz: TimeZone>(
        &self,
        tz: &Tz,
        date: NaiveDate,
        offset_seconds: i32,
    ) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
        let offset_hours = fold_utc_offset(offset_seconds);
        let times = self.provider.sun_times(
            date,
            self.location.latitude,
            self.location.longitude,
            offset_hours,
        )?;
        let sunrise = restamp(tz, date, times.sunrise)?;
        let mut sunset = restamp(tz, date, times.sunset)?;
        if sunset <= sunrise {
            let next = date.succ_opt().ok_or_else(|| {
                ShubhError::InvalidDatetime(format!("no calendar day after {date}"))
            })?;
            sunset = restamp(tz, next, times.sunset)?;
            self.log.debug(format_args!(
                "sunset after local midnight, moved to {}",
                sunset.to_rfc3339()
            ));
        }
        Ok((sunrise, sunset))
    }
}

/// Combine a local date and time of day into an instant in `tz`.
///
/// Ambiguous local times (DST fall-back) take the earlier instant.
fn restamp<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| {
            ShubhError::InvalidDatetime(format!(
                "{date} {time} does not exist in the local timezone"
            ))
        })
}

/// UTC offset in seconds at local midnight of `date`, if midnight exists.
fn offset_at_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<i32> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.offset().fix().local_minus_utc())
}
