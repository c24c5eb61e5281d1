//! Observer location and environment-driven settings.
//!
//! | Variable    | Meaning                               | Default   |
//! |-------------|---------------------------------------|-----------|
//! | `LATITUDE`  | decimal degrees, north positive       | `26.7880` |
//! | `LONGITUDE` | decimal degrees, east positive        | `82.1986` |
//! | `TIMEZONE`  | IANA name used for "now"              | system    |
//! | `DEBUG`     | any value enables verbose debug trace | unset     |

use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, ShubhError};

/// Reference latitude used when none is configured.
pub const DEFAULT_LATITUDE: f64 = 26.7880;

/// Reference longitude used when none is configured.
pub const DEFAULT_LONGITUDE: f64 = 82.1986;

/// Where on Earth sunrise and sunset are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Build a location, rejecting coordinates outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ShubhError::InvalidConfig(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ShubhError::InvalidConfig(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

/// Process-level settings, read once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub location: Location,
    /// `None` means the system local timezone.
    pub timezone: Option<Tz>,
    pub debug: bool,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let latitude = parse_coordinate("LATITUDE", lookup("LATITUDE"), DEFAULT_LATITUDE)?;
        let longitude = parse_coordinate("LONGITUDE", lookup("LONGITUDE"), DEFAULT_LONGITUDE)?;
        let timezone = match lookup("TIMEZONE") {
            Some(name) if !name.trim().is_empty() => Some(parse_timezone(&name)?),
            _ => None,
        };

        Ok(Self {
            location: Location::new(latitude, longitude)?,
            timezone,
            debug: lookup("DEBUG").is_some(),
        })
    }
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| ShubhError::InvalidTimezone(format!("'{}'", s)))
}

fn parse_coordinate(key: &str, raw: Option<String>, default: f64) -> Result<f64> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<f64>()
            .map_err(|e| ShubhError::InvalidConfig(format!("{key}='{value}': {e}"))),
    }
}
