//! Demand resampling window durations such as `"15min"` or `"1h"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Length of the non-overlapping windows a power channel is resampled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DemandWindow {
    seconds: i64,
}

impl DemandWindow {
    /// Creates a window of the given length in seconds.
    ///
    /// Non-positive lengths are representable so that tariff validation can
    /// report them with a field path.
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    /// Creates a window of the given length in minutes, saturating at the
    /// largest representable length.
    pub fn from_minutes(minutes: i64) -> Self {
        Self::from_seconds(minutes.saturating_mul(60))
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }
}

impl Default for DemandWindow {
    fn default() -> Self {
        Self::from_minutes(15)
    }
}

impl fmt::Display for DemandWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds;
        if s != 0 && s % 3600 == 0 {
            write!(f, "{}h", s / 3600)
        } else if s != 0 && s % 60 == 0 {
            write!(f, "{}min", s / 60)
        } else {
            write!(f, "{s}s")
        }
    }
}

impl FromStr for DemandWindow {
    type Err = String;

    /// Parses `<n>s`, `<n>min`, `<n>T` or `<n>h` with `n > 0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("window \"{s}\" has no unit (expected s, min or h)"))?;
        let (digits, unit) = s.split_at(split);
        let n: i64 = digits
            .parse()
            .map_err(|_| format!("window \"{s}\" must start with a whole number"))?;
        if n <= 0 {
            return Err(format!("window \"{s}\" must be > 0"));
        }
        let unit_seconds = match unit.trim() {
            "s" | "sec" => 1,
            "min" | "T" | "m" => 60,
            "h" | "H" => 3600,
            other => return Err(format!("window \"{s}\" has unknown unit \"{other}\"")),
        };
        let seconds = n
            .checked_mul(unit_seconds)
            .ok_or_else(|| format!("window \"{s}\" is too large"))?;
        Ok(Self::from_seconds(seconds))
    }
}

impl<'de> Deserialize<'de> for DemandWindow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
