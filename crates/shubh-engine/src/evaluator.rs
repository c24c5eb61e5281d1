//! The composed evaluation: "is now a good time?"
//!
//! [`ShubhEvaluator`] ties a [`Location`], a [`SunTimeProvider`] and a
//! [`DebugLog`] together. Every operation takes the instant to evaluate as
//! an argument and recomputes everything from it; the evaluator holds no
//! mutable state and can be shared freely between threads.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::config::Location;
use crate::error::{Result, ShubhError};
use crate::locator::{self, PeriodPosition, PhaseSchedule, Slot};
use crate::log::{DebugLog, Quiet};
use crate::period::Phase;
use crate::sun::SunTimeProvider;
use crate::vedic_day::{VedicDay, VedicDayResolver};

/// The serialisable answer for one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub is_auspicious: bool,
    /// Unix seconds.
    pub next_auspicious_start: i64,
    pub current_period_name: String,
    /// Period name → Unix seconds for the active phase.
    pub schedule: BTreeMap<String, i64>,
}

pub struct ShubhEvaluator<P> {
    location: Location,
    provider: P,
    log: Box<dyn DebugLog>,
}

impl<P: SunTimeProvider> ShubhEvaluator<P> {
    /// An evaluator that logs nothing.
    pub fn new(location: Location, provider: P) -> Self {
        Self {
            location,
            provider,
            log: Box::new(Quiet),
        }
    }

    /// Replace the debug log.
    pub fn with_log(mut self, log: Box<dyn DebugLog>) -> Self {
        self.log = log;
        self
    }

    pub fn location(&self) -> Location {
        self.location
    }

    fn resolver(&self) -> VedicDayResolver<'_, P> {
        VedicDayResolver::new(self.location, &self.provider, self.log.as_ref())
    }

    /// The Vedic day containing `now`.
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<VedicDay<Tz>> {
        self.resolver().resolve(now)
    }

    /// The period containing `now`.
    pub fn locate<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<PeriodPosition<Tz>> {
        let day = self.resolve(now)?;
        Ok(self.locate_in_day(now, &day))
    }

    pub fn is_auspicious_now<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<bool> {
        Ok(self.locate(now)?.is_auspicious())
    }

    pub fn current_period_name<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<String> {
        Ok(self.locate(now)?.kind.name().to_string())
    }

    /// All eight periods of the phase containing `now`.
    pub fn full_schedule<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<PhaseSchedule<Tz>> {
        let day = self.resolve(now)?;
        Ok(locator::schedule_from(now, &day))
    }

    /// Start of the first auspicious period beginning strictly after `now`.
    pub fn next_auspicious_start<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<DateTime<Tz>> {
        Ok(self.next_auspicious_slot(now)?.start)
    }

    /// The first auspicious period beginning strictly after `now`.
    ///
    /// Searches the rest of the current phase, then the whole of the next
    /// one: the night of the same Vedic day after a day phase, or the day
    /// phase of the following Vedic day after a night phase.
    ///
    /// # Errors
    ///
    /// [`ShubhError::NoAuspiciousSlotFound`] when neither phase has one, in
    /// addition to any error from resolving the Vedic day.
    pub fn next_auspicious_slot<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Slot<Tz>> {
        let day = self.resolve(now)?;
        self.next_auspicious_in_day(now, &day)
    }

    /// The period containing `now` and the next auspicious slot, both from
    /// one Vedic day resolution.
    pub fn locate_with_next<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<(PeriodPosition<Tz>, Slot<Tz>)> {
        let day = self.resolve(now)?;
        let position = self.locate_in_day(now, &day);
        let next = self.next_auspicious_in_day(now, &day)?;
        Ok((position, next))
    }

    /// Everything at once, from a single Vedic day resolution.
    pub fn evaluate<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<Evaluation> {
        let day = self.resolve(now)?;
        let position = self.locate_in_day(now, &day);
        let schedule = locator::schedule_from(now, &day);
        let next = self.next_auspicious_in_day(now, &day)?;

        Ok(Evaluation {
            is_auspicious: position.is_auspicious(),
            next_auspicious_start: next.start.timestamp(),
            current_period_name: position.kind.name().to_string(),
            schedule: schedule.by_name(),
        })
    }

    fn locate_in_day<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        day: &VedicDay<Tz>,
    ) -> PeriodPosition<Tz> {
        let position = locator::locate(now, day);
        self.log.debug(format_args!(
            "phase: {}, weekday: {}, period length: {}s, index: {}, kind: {}",
            position.phase,
            position.weekday,
            position.period_seconds,
            position.index,
            position.kind
        ));
        position
    }

    fn next_auspicious_in_day<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        day: &VedicDay<Tz>,
    ) -> Result<Slot<Tz>> {
        let span = day.span_at(now);
        let current = PhaseSchedule::for_span(&span);
        if let Some(slot) = current.first_auspicious_after(now) {
            return Ok(slot.clone());
        }

        let next_span = match span.phase {
            Phase::Day => day.night(),
            Phase::Night => self.resolver().following_day(day)?,
        };
        self.log.debug(format_args!(
            "no auspicious period left in the {} phase, scanning {} {}",
            span.phase, next_span.weekday, next_span.phase
        ));

        let next = PhaseSchedule::for_span(&next_span);
        next.first_auspicious_after(now).cloned().ok_or_else(|| {
            ShubhError::NoAuspiciousSlotFound(format!(
                "none after {} in the {} {} or {} {} phases",
                now.to_rfc3339(),
                span.weekday,
                span.phase,
                next_span.weekday,
                next_span.phase
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodKind;
    use crate::sun::{FixedSunTimes, SpaSunTimes, SunTimeError, SunTimes};
    use chrono::{FixedOffset, NaiveDate, NaiveTime, Weekday};

    fn ist() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600 + 1800).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
        ist().with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap()
    }

    fn fixed() -> ShubhEvaluator<FixedSunTimes> {
        ShubhEvaluator::new(
            Location::new(26.7880, 82.1986).unwrap(),
            FixedSunTimes::new(
                NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            ),
        )
    }

    /// Rises at 06:00 and sets at 18:00, except on the listed dates.
    struct FailsOn(Vec<NaiveDate>);

    impl SunTimeProvider for FailsOn {
        fn sun_times(
            &self,
            date: NaiveDate,
            latitude: f64,
            _longitude: f64,
            _utc_offset_hours: f64,
        ) -> std::result::Result<SunTimes, SunTimeError> {
            if self.0.contains(&date) {
                return Err(SunTimeError::NoSunriseOrSunset { date, latitude });
            }
            Ok(SunTimes {
                sunrise: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                sunset: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            })
        }
    }

    // ── reference scenarios ─────────────────────────────────────────────

    #[test]
    fn test_nine_am_monday() {
        let ev = fixed();
        let now = at(2026, 3, 16, 9, 0);
        let pos = ev.locate(&now).unwrap();
        assert_eq!(pos.phase, Phase::Day);
        assert_eq!(pos.period_seconds, 5400.0);
        assert_eq!(pos.index, 2);
        assert_eq!(ev.current_period_name(&now).unwrap(), "shubh");
        assert!(ev.is_auspicious_now(&now).unwrap());
        // Remaining day periods: rog, udveg, chal, labh (15:00), amrit.
        assert_eq!(ev.next_auspicious_start(&now).unwrap(), at(2026, 3, 16, 15, 0));
    }

    #[test]
    fn test_seven_pm_monday() {
        let ev = fixed();
        let now = at(2026, 3, 16, 19, 0);
        let pos = ev.locate(&now).unwrap();
        assert_eq!(pos.phase, Phase::Night);
        assert_eq!(pos.index, 0);
        assert_eq!(pos.kind, PeriodKind::Chal);
        assert!(!ev.is_auspicious_now(&now).unwrap());
        // Monday night: chal, rog, kaal, labh at 22:30.
        assert_eq!(ev.next_auspicious_start(&now).unwrap(), at(2026, 3, 16, 22, 30));
    }

    #[test]
    fn test_after_midnight_keys_rotation_by_previous_sunrise() {
        let ev = fixed();
        // Tuesday 00:30 is still Monday's Vedic day.
        let now = at(2026, 3, 17, 0, 30);
        let pos = ev.locate(&now).unwrap();
        assert_eq!(pos.weekday, Weekday::Mon);
        assert_eq!(pos.phase, Phase::Night);
        assert_eq!(pos.index, 4);
        assert_eq!(pos.kind, PeriodKind::Udveg);
    }

    // ── next auspicious start ───────────────────────────────────────────

    #[test]
    fn test_next_auspicious_moves_from_day_into_night() {
        let ev = fixed();
        // Friday day: ... rog (13:30), udveg, chal. Friday night opens rog, kaal, labh.
        let now = at(2026, 3, 20, 14, 0);
        let slot = ev.next_auspicious_slot(&now).unwrap();
        assert_eq!(slot.kind, PeriodKind::Labh);
        assert_eq!(slot.start, at(2026, 3, 20, 21, 0));
    }

    #[test]
    fn test_next_auspicious_moves_from_night_into_next_day() {
        let ev = fixed();
        // Tuesday night at 02:00 Wednesday: chal, then rog, kaal. Wednesday opens with labh.
        let now = at(2026, 3, 18, 2, 0);
        let slot = ev.next_auspicious_slot(&now).unwrap();
        assert_eq!(slot.kind, PeriodKind::Labh);
        assert_eq!(slot.start, at(2026, 3, 18, 6, 0));
    }

    #[test]
    fn test_next_auspicious_wraps_saturday_night_into_sunday() {
        let ev = fixed();
        // Saturday night's last period (labh) began at 04:30 Sunday.
        let now = at(2026, 3, 15, 5, 0);
        assert!(ev.is_auspicious_now(&now).unwrap());
        let slot = ev.next_auspicious_slot(&now).unwrap();
        // Sunday day: udveg, chal, labh at 09:00.
        assert_eq!(slot.kind, PeriodKind::Labh);
        assert_eq!(slot.start, at(2026, 3, 15, 9, 0));
    }

    #[test]
    fn test_next_auspicious_crosses_year_end() {
        let ev = fixed();
        // Thursday 2026-12-31 night ends with amrit from 04:30.
        let now = at(2027, 1, 1, 5, 0);
        let slot = ev.next_auspicious_slot(&now).unwrap();
        // Friday day: chal, labh at 07:30.
        assert_eq!(slot.kind, PeriodKind::Labh);
        assert_eq!(slot.start, at(2027, 1, 1, 7, 30));
    }

    #[test]
    fn test_next_auspicious_propagates_sun_failure_for_next_day() {
        let tomorrow = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let ev = ShubhEvaluator::new(Location::default(), FailsOn(vec![tomorrow]));
        // Before sunrise only the 17th and the 16th are consulted.
        assert!(ev.next_auspicious_start(&at(2026, 3, 17, 2, 0)).is_ok());
        // After sunrise it needs the 18th for the next sunrise.
        let err = ev.next_auspicious_start(&at(2026, 3, 17, 12, 0)).unwrap_err();
        assert!(matches!(err, ShubhError::SunTimeComputationFailed(_)));
    }

    // ── evaluate ────────────────────────────────────────────────────────

    #[test]
    fn test_evaluate_output_shape() {
        let ev = fixed();
        let now = at(2026, 3, 16, 9, 0);
        let evaluation = ev.evaluate(&now).unwrap();
        assert!(evaluation.is_auspicious);
        assert_eq!(evaluation.current_period_name, "shubh");
        assert_eq!(
            evaluation.next_auspicious_start,
            at(2026, 3, 16, 15, 0).timestamp()
        );
        assert_eq!(evaluation.schedule.len(), 7);
        assert_eq!(evaluation.schedule["rog"], at(2026, 3, 16, 10, 30).timestamp());

        let json = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(json["isAuspicious"], true);
        assert_eq!(json["currentPeriodName"], "shubh");
        assert!(json["nextAuspiciousStart"].is_i64());
        assert!(json["schedule"]["amrit"].is_i64());
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let ev = ShubhEvaluator::new(Location::default(), SpaSunTimes);
        let now = at(2026, 3, 16, 23, 17);
        let first = serde_json::to_string(&ev.evaluate(&now).unwrap()).unwrap();
        let second = serde_json::to_string(&ev.evaluate(&now).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_evaluate_with_spa_at_reference_location() {
        let ev = ShubhEvaluator::new(Location::default(), SpaSunTimes);
        // Sunrise about 06:09:36, sunset about 18:10:08, so each period is about 5404s.
        let evaluation = ev.evaluate(&at(2026, 3, 16, 9, 0)).unwrap();
        assert_eq!(evaluation.current_period_name, "kaal");
        assert!(!evaluation.is_auspicious);
        let evaluation = ev.evaluate(&at(2026, 3, 16, 10, 0)).unwrap();
        assert_eq!(evaluation.current_period_name, "shubh");
        assert!(evaluation.is_auspicious);
    }

    #[test]
    fn test_evaluate_reykjavik_when_sunset_follows_midnight() {
        let location = Location::new(64.1466, -21.9426).unwrap();
        let ev = ShubhEvaluator::new(location, SpaSunTimes);
        let tz = chrono_tz::Atlantic::Reykjavik;
        for (d, h) in [(21, 12), (21, 23), (22, 0), (22, 2)] {
            let now = tz.with_ymd_and_hms(2026, 6, d, h, 30, 0).single().unwrap();
            let evaluation = ev.evaluate(&now).unwrap();
            assert!(evaluation.next_auspicious_start > now.timestamp());
            assert_eq!(evaluation.schedule.len(), 7);
        }
    }

    #[test]
    fn test_locate_with_next_matches_separate_calls() {
        let ev = fixed();
        for now in [at(2026, 3, 16, 9, 0), at(2026, 3, 16, 19, 0), at(2026, 3, 17, 2, 0)] {
            let (position, next) = ev.locate_with_next(&now).unwrap();
            assert_eq!(position.kind, ev.locate(&now).unwrap().kind);
            assert_eq!(next.start, ev.next_auspicious_start(&now).unwrap());
            assert!(next.start > now);
        }
    }

    #[test]
    fn test_evaluate_surfaces_polar_failure() {
        let ev = ShubhEvaluator::new(Location::new(80.0, 0.0).unwrap(), SpaSunTimes);
        let utc = FixedOffset::east_opt(0).unwrap();
        let now = utc.with_ymd_and_hms(2026, 12, 21, 12, 0, 0).single().unwrap();
        let err = ev.evaluate(&now).unwrap_err();
        assert!(matches!(err, ShubhError::SunTimeComputationFailed(_)));
    }

    #[test]
    fn test_with_log_receives_trace() {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Shared(Arc<Mutex<Vec<String>>>);

        impl DebugLog for Shared {
            fn debug(&self, message: std::fmt::Arguments<'_>) {
                self.0.lock().unwrap().push(message.to_string());
            }
        }

        let sink = Shared::default();
        let ev = fixed().with_log(Box::new(sink.clone()));
        ev.locate(&at(2026, 3, 17, 0, 30)).unwrap();
        let lines = sink.0.lock().unwrap();
        assert!(lines.iter().any(|l| l.contains("not yet up")), "{lines:?}");
        assert!(lines.iter().any(|l| l.contains("index: 4")), "{lines:?}");
    }
}
