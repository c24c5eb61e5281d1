//! Chowgadhiya kinds and the weekday rotation table.
//!
//! Each half of a Vedic day (the [`Phase`]) is split into eight periods. The
//! label of every period comes from a fixed table keyed by phase and by the
//! weekday on which that Vedic day's sunrise occurred. Every row holds eight
//! entries and the eighth always repeats the first.
//!
//! Reference: <https://hinduism.stackexchange.com/questions/26242/how-is-the-first-choghadiya-decided>

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Number of periods in one phase.
pub const PERIODS_PER_PHASE: usize = 8;

/// Half of a Vedic day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Sunrise to sunset.
    Day,
    /// Sunset to the next sunrise.
    Night,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Day => "day",
            Phase::Night => "night",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The seven recurring Chowgadhiya labels.
///
/// The declaration order is the canonical order of the labels, not a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Chal,
    Amrit,
    Kaal,
    Labh,
    Rog,
    Shubh,
    Udveg,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 7] = [
        PeriodKind::Chal,
        PeriodKind::Amrit,
        PeriodKind::Kaal,
        PeriodKind::Labh,
        PeriodKind::Rog,
        PeriodKind::Shubh,
        PeriodKind::Udveg,
    ];

    /// Lowercase label, as used in serialized output.
    pub fn name(self) -> &'static str {
        match self {
            PeriodKind::Chal => "chal",
            PeriodKind::Amrit => "amrit",
            PeriodKind::Kaal => "kaal",
            PeriodKind::Labh => "labh",
            PeriodKind::Rog => "rog",
            PeriodKind::Shubh => "shubh",
            PeriodKind::Udveg => "udveg",
        }
    }

    /// Whether this label counts as auspicious. See [`classify`].
    pub fn is_auspicious(self) -> bool {
        classify(self)
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PeriodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PeriodKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| format!("unknown chowgadhiya '{}'", s.trim()))
    }
}

use PeriodKind::{Amrit, Chal, Kaal, Labh, Rog, Shubh, Udveg};

/// Day rows, Sunday first.
const DAY_ROWS: [[PeriodKind; PERIODS_PER_PHASE]; 7] = [
    [Udveg, Chal, Labh, Amrit, Kaal, Shubh, Rog, Udveg],
    [Amrit, Kaal, Shubh, Rog, Udveg, Chal, Labh, Amrit],
    [Rog, Udveg, Chal, Labh, Amrit, Kaal, Shubh, Rog],
    [Labh, Amrit, Kaal, Shubh, Rog, Udveg, Chal, Labh],
    [Shubh, Rog, Udveg, Chal, Labh, Amrit, Kaal, Shubh],
    [Chal, Labh, Amrit, Kaal, Shubh, Rog, Udveg, Chal],
    [Kaal, Shubh, Rog, Udveg, Chal, Labh, Amrit, Kaal],
];

/// Night rows, Sunday first.
const NIGHT_ROWS: [[PeriodKind; PERIODS_PER_PHASE]; 7] = [
    [Shubh, Amrit, Chal, Rog, Kaal, Labh, Udveg, Shubh],
    [Chal, Rog, Kaal, Labh, Udveg, Shubh, Amrit, Chal],
    [Kaal, Labh, Udveg, Shubh, Amrit, Chal, Rog, Kaal],
    [Udveg, Shubh, Amrit, Chal, Rog, Kaal, Labh, Udveg],
    [Amrit, Chal, Rog, Kaal, Labh, Udveg, Shubh, Amrit],
    [Rog, Kaal, Labh, Udveg, Shubh, Amrit, Chal, Rog],
    [Labh, Udveg, Shubh, Amrit, Chal, Rog, Kaal, Labh],
];

/// The ordered eight labels for `phase` on a Vedic day whose sunrise fell on `weekday`.
pub fn lookup(phase: Phase, weekday: Weekday) -> &'static [PeriodKind; PERIODS_PER_PHASE] {
    let row = weekday.num_days_from_sunday() as usize;
    match phase {
        Phase::Day => &DAY_ROWS[row],
        Phase::Night => &NIGHT_ROWS[row],
    }
}

/// Auspicious labels are exactly Amrit, Shubh and Labh.
///
/// Chal is sometimes treated as auspicious; it is deliberately left out here.
pub fn classify(kind: PeriodKind) -> bool {
    matches!(kind, Amrit | Shubh | Labh)
}
