//! The closed set of charge variants a tariff is composed of.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::window::DemandWindow;

/// Discriminant of a [`Charge`], used for line-item labels and the `type`
/// tag of tariff documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKind {
    Consumption,
    Demand,
    TimeOfUse,
    Seasonal,
    Scheduled,
    Flat,
}

impl ChargeKind {
    /// Snake-case name, as written in documents and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consumption => "consumption",
            Self::Demand => "demand",
            Self::TimeOfUse => "time_of_use",
            Self::Seasonal => "seasonal",
            Self::Scheduled => "scheduled",
            Self::Flat => "flat",
        }
    }
}

impl fmt::Display for ChargeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One consumption tier: usage up to `limit` (cumulative) is billed at `rate`.
///
/// The final band of a list has no limit and is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateBand {
    /// Upper cumulative threshold, `None` for the unbounded final band.
    #[serde(default)]
    pub limit: Option<f64>,
    /// Per-unit rate within this band.
    pub rate: f64,
}

impl RateBand {
    /// A band covering usage up to `limit`.
    pub fn limited(limit: f64, rate: f64) -> Self {
        Self {
            limit: Some(limit),
            rate,
        }
    }

    /// The unbounded final band.
    pub fn unbounded(rate: f64) -> Self {
        Self { limit: None, rate }
    }
}

/// Tiered per-unit charge on summed usage, reset every billing period.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionCharge {
    /// Channel override; defaults to the tariff's energy channel.
    pub channel: Option<String>,
    /// Bands in ascending limit order, last band unbounded.
    pub rate_bands: Vec<RateBand>,
}

/// How a demand peak is priced.
#[derive(Debug, Clone, PartialEq)]
pub enum DemandPricing {
    /// `rate * peak`.
    Flat { rate: f64 },
    /// Peak split across bands like consumption usage.
    Banded { rate_bands: Vec<RateBand> },
}

/// Charge on the peak windowed power of each billing period.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandCharge {
    /// Channel override; defaults to the tariff's power channel.
    pub channel: Option<String>,
    pub pricing: DemandPricing,
    /// Resampling window; defaults to the tariff's demand window.
    pub window: Option<DemandWindow>,
}

/// A weekday range combined with a time-of-day range.
///
/// Weekdays count from Monday = 0. Omitted time bounds default to
/// `00:00` (from) and `23:59` (to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimePeriod {
    pub from_weekday: u32,
    pub to_weekday: u32,
    #[serde(default)]
    pub from_hour: Option<u32>,
    #[serde(default)]
    pub from_minute: Option<u32>,
    #[serde(default)]
    pub to_hour: Option<u32>,
    #[serde(default)]
    pub to_minute: Option<u32>,
}

impl TimePeriod {
    /// A period covering whole days from `from_weekday` to `to_weekday`.
    pub fn all_day(from_weekday: u32, to_weekday: u32) -> Self {
        Self {
            from_weekday,
            to_weekday,
            from_hour: None,
            from_minute: None,
            to_hour: None,
            to_minute: None,
        }
    }

    /// A period from `from_hour:00` through `to_hour:59` on the given weekdays.
    pub fn hours(from_weekday: u32, to_weekday: u32, from_hour: u32, to_hour: u32) -> Self {
        Self {
            from_hour: Some(from_hour),
            to_hour: Some(to_hour),
            ..Self::all_day(from_weekday, to_weekday)
        }
    }

    /// Start of the time-of-day range as minutes since midnight.
    pub fn from_minute_of_day(&self) -> u32 {
        self.from_hour.unwrap_or(0) * 60 + self.from_minute.unwrap_or(0)
    }

    /// Inclusive end of the time-of-day range as minutes since midnight.
    pub fn to_minute_of_day(&self) -> u32 {
        self.to_hour.unwrap_or(23) * 60 + self.to_minute.unwrap_or(59)
    }
}

/// A named set of time periods; a sample in any of them is in the set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeOfDay {
    pub name: String,
    pub periods: Vec<TimePeriod>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeOfUseCharge {
    pub channel: Option<String>,
    pub rate: f64,
    pub time: TimeOfDay,
}

/// A named calendar date range, inclusive at both ends, ignoring year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Season {
    pub name: String,
    pub from_month: u32,
    pub from_day: u32,
    pub to_month: u32,
    pub to_day: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalCharge {
    pub channel: Option<String>,
    pub rate: f64,
    pub season: Season,
}

/// A rate that takes effect at `datetime`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleEntry {
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub datetime: NaiveDateTime,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCharge {
    pub channel: Option<String>,
    /// Entries sorted ascending by `datetime`.
    pub rate_schedule: Vec<ScheduleEntry>,
}

/// Per-unit charge over the full series; a negative rate is a credit.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatCharge {
    pub channel: Option<String>,
    pub rate: f64,
}

/// One independent rating rule contributing an additive amount to the bill.
#[derive(Debug, Clone, PartialEq)]
pub enum Charge {
    Consumption(ConsumptionCharge),
    Demand(DemandCharge),
    TimeOfUse(TimeOfUseCharge),
    Seasonal(SeasonalCharge),
    Scheduled(ScheduledCharge),
    Flat(FlatCharge),
}

impl Charge {
    /// The variant's discriminant.
    pub fn kind(&self) -> ChargeKind {
        match self {
            Self::Consumption(_) => ChargeKind::Consumption,
            Self::Demand(_) => ChargeKind::Demand,
            Self::TimeOfUse(_) => ChargeKind::TimeOfUse,
            Self::Seasonal(_) => ChargeKind::Seasonal,
            Self::Scheduled(_) => ChargeKind::Scheduled,
            Self::Flat(_) => ChargeKind::Flat,
        }
    }

    /// Explicit channel override, if any.
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::Consumption(c) => c.channel.as_deref(),
            Self::Demand(c) => c.channel.as_deref(),
            Self::TimeOfUse(c) => c.channel.as_deref(),
            Self::Seasonal(c) => c.channel.as_deref(),
            Self::Scheduled(c) => c.channel.as_deref(),
            Self::Flat(c) => c.channel.as_deref(),
        }
    }

    /// Display label: the period or season name where one exists, otherwise the kind.
    pub fn label(&self) -> &str {
        match self {
            Self::TimeOfUse(c) => &c.time.name,
            Self::Seasonal(c) => &c.season.name,
            Self::Consumption(_) | Self::Demand(_) | Self::Scheduled(_) | Self::Flat(_) => {
                self.kind().as_str()
            }
        }
    }

    /// Whether this charge reads the power channel by default (rather than energy).
    pub fn reads_power(&self) -> bool {
        matches!(self, Self::Demand(_))
    }
}
