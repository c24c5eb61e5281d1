//! Which Chowgadhiya contains an instant, and when every period starts.
//!
//! A phase is cut into eight periods of equal, fractional-second length.
//! Day and night lengths differ from each other and change with the season,
//! so a period is rarely the nominal ninety minutes.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Weekday};

use crate::period::{Phase, PeriodKind, PERIODS_PER_PHASE};
use crate::vedic_day::{seconds_between, PhaseSpan, VedicDay};

/// Where an instant sits within its Vedic day.
#[derive(Debug, Clone)]
pub struct PeriodPosition<Tz: TimeZone> {
    pub phase: Phase,
    pub weekday: Weekday,
    /// Zero-based period index within the phase, in `0..8`.
    pub index: usize,
    pub period_seconds: f64,
    pub kind: PeriodKind,
    /// Sunrise for the day phase, sunset for the night phase.
    pub phase_start: DateTime<Tz>,
}

impl<Tz: TimeZone> PeriodPosition<Tz> {
    pub fn is_auspicious(&self) -> bool {
        self.kind.is_auspicious()
    }
}

/// One period of a phase with its absolute start.
#[derive(Debug, Clone)]
pub struct Slot<Tz: TimeZone> {
    pub index: usize,
    pub kind: PeriodKind,
    pub start: DateTime<Tz>,
}

impl<Tz: TimeZone> Slot<Tz> {
    pub fn is_auspicious(&self) -> bool {
        self.kind.is_auspicious()
    }
}

/// All eight periods of one phase, in index order.
#[derive(Debug, Clone)]
pub struct PhaseSchedule<Tz: TimeZone> {
    pub phase: Phase,
    pub weekday: Weekday,
    pub period_seconds: f64,
    pub slots: Vec<Slot<Tz>>,
}

impl<Tz: TimeZone> PhaseSchedule<Tz> {
    pub fn for_span(span: &PhaseSpan<Tz>) -> Self {
        let slots = span
            .kinds()
            .iter()
            .enumerate()
            .map(|(index, kind)| Slot {
                index,
                kind: *kind,
                start: span.period_start(index),
            })
            .collect();

        Self {
            phase: span.phase,
            weekday: span.weekday,
            period_seconds: span.period_seconds(),
            slots,
        }
    }

    /// Period name → start as Unix seconds.
    ///
    /// The closing slot repeats the first slot's kind, so its start replaces
    /// the first one under that name. Use [`PhaseSchedule::slots`] when
    /// order matters.
    pub fn by_name(&self) -> BTreeMap<String, i64> {
        let Some(first) = self.slots.first() else {
            return BTreeMap::new();
        };
        let base = first.start.timestamp();
        self.slots
            .iter()
            .map(|slot| {
                let delta = (slot.index as f64 * self.period_seconds) as i64;
                (slot.kind.name().to_string(), base + delta)
            })
            .collect()
    }

    /// Earliest auspicious slot starting strictly after `now`.
    pub fn first_auspicious_after(&self, now: &DateTime<Tz>) -> Option<&Slot<Tz>> {
        self.slots
            .iter()
            .find(|slot| slot.start > *now && slot.is_auspicious())
    }
}

/// Locate `now` within `day`.
///
/// `now` is expected to satisfy `sunrise <= now < next_sunrise`, which
/// [`crate::vedic_day::VedicDayResolver::resolve`] guarantees. The index is
/// clamped to `0..8` regardless.
pub fn locate<Tz: TimeZone>(now: &DateTime<Tz>, day: &VedicDay<Tz>) -> PeriodPosition<Tz> {
    locate_in(now, &day.span_at(now))
}

/// Locate `now` within a single phase.
pub fn locate_in<Tz: TimeZone>(now: &DateTime<Tz>, span: &PhaseSpan<Tz>) -> PeriodPosition<Tz> {
    let period_seconds = span.period_seconds();
    let elapsed = seconds_between(&span.start, now);
    let raw = (elapsed / period_seconds).floor();
    let index = if raw.is_nan() || raw < 0.0 {
        0
    } else {
        (raw as usize).min(PERIODS_PER_PHASE - 1)
    };

    PeriodPosition {
        phase: span.phase,
        weekday: span.weekday,
        index,
        period_seconds,
        kind: span.kinds()[index],
        phase_start: span.start.clone(),
    }
}

/// The schedule of the phase containing `now`.
pub fn schedule_from<Tz: TimeZone>(now: &DateTime<Tz>, day: &VedicDay<Tz>) -> PhaseSchedule<Tz> {
    PhaseSchedule::for_span(&day.span_at(now))
}
