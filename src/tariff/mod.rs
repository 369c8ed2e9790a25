//! Tariff definition: global defaults plus an ordered list of charges.

pub mod charge;
/// TOML/JSON tariff documents.
pub mod document;
pub mod window;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{TariffError, TariffIssue};

pub use charge::{
    Charge, ChargeKind, ConsumptionCharge, DemandCharge, DemandPricing, FlatCharge, RateBand,
    ScheduleEntry, ScheduledCharge, Season, SeasonalCharge, TimeOfDay, TimeOfUseCharge,
    TimePeriod,
};
pub use document::TariffDocument;
pub use window::DemandWindow;

/// Reset cadence for tiered consumption and demand accumulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingPeriod {
    /// One period spanning the whole series.
    #[default]
    None,
    /// Calendar months.
    Monthly,
    /// Calendar years.
    Annual,
}

/// Channel names used when a charge does not name its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDefaults {
    /// Default for consumption, flat, scheduled, seasonal and TOU charges.
    pub energy: String,
    /// Default for demand charges.
    pub power: String,
}

impl Default for ChannelDefaults {
    fn default() -> Self {
        Self {
            energy: "imported energy (kwh)".to_string(),
            power: "imported power (kw)".to_string(),
        }
    }
}

/// Tariff-wide settings shared by every charge.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffSettings {
    /// Service identifier (e.g. `"electricity"`).
    pub service: String,
    /// Unit of energy readings (e.g. `"kWh"`).
    pub consumption_unit: String,
    /// Unit of demand readings (e.g. `"kVA"`).
    pub demand_unit: String,
    pub billing_period: BillingPeriod,
    /// Window used by demand charges that do not set their own.
    pub demand_window: DemandWindow,
    pub channels: ChannelDefaults,
}

impl Default for TariffSettings {
    fn default() -> Self {
        Self {
            service: "electricity".to_string(),
            consumption_unit: "kWh".to_string(),
            demand_unit: "kVA".to_string(),
            billing_period: BillingPeriod::None,
            demand_window: DemandWindow::default(),
            channels: ChannelDefaults::default(),
        }
    }
}

/// A validated, immutable tariff.
///
/// # Examples
///
/// ```
/// use tariff_rater::tariff::{BillingPeriod, Charge, ConsumptionCharge, RateBand, Tariff, TariffSettings};
///
/// let tariff = Tariff::new(
///     TariffSettings {
///         billing_period: BillingPeriod::Monthly,
///         ..TariffSettings::default()
///     },
///     vec![Charge::Consumption(ConsumptionCharge {
///         channel: None,
///         rate_bands: vec![RateBand::limited(10.0, 0.10), RateBand::unbounded(0.30)],
///     })],
/// );
/// assert!(tariff.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    settings: TariffSettings,
    charges: Vec<Charge>,
}

impl Tariff {
    /// Validates and builds a tariff.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::Malformed`] listing every problem found.
    pub fn new(settings: TariffSettings, charges: Vec<Charge>) -> Result<Self, TariffError> {
        let issues = validate(&settings, &charges);
        if !issues.is_empty() {
            return Err(TariffError::Malformed(issues));
        }
        Ok(Self { settings, charges })
    }

    pub fn service(&self) -> &str {
        &self.settings.service
    }

    pub fn consumption_unit(&self) -> &str {
        &self.settings.consumption_unit
    }

    pub fn demand_unit(&self) -> &str {
        &self.settings.demand_unit
    }

    pub fn billing_period(&self) -> BillingPeriod {
        self.settings.billing_period
    }

    pub fn demand_window(&self) -> DemandWindow {
        self.settings.demand_window
    }

    pub fn channels(&self) -> &ChannelDefaults {
        &self.settings.channels
    }

    /// Charges in evaluation order.
    pub fn charges(&self) -> &[Charge] {
        &self.charges
    }
}

/// Collects every construction-time problem with `settings` and `charges`.
fn validate(settings: &TariffSettings, charges: &[Charge]) -> Vec<TariffIssue> {
    let mut issues = Vec::new();

    if settings.demand_window.seconds() <= 0 {
        issues.push(TariffIssue::new("demand_window", "must be > 0"));
    }
    if charges.is_empty() {
        issues.push(TariffIssue::new("charges", "must not be empty"));
    }

    for (i, charge) in charges.iter().enumerate() {
        let path = format!("charges[{i}]");
        if charge.channel().is_some_and(str::is_empty) {
            issues.push(TariffIssue::new(
                format!("{path}.meter"),
                "must not be empty",
            ));
        }
        match charge {
            Charge::Consumption(c) => {
                check_rate_bands(&c.rate_bands, &format!("{path}.rate_bands"), &mut issues);
            }
            Charge::Demand(c) => {
                match &c.pricing {
                    DemandPricing::Flat { rate } => {
                        check_rate(*rate, &format!("{path}.rate"), &mut issues);
                    }
                    DemandPricing::Banded { rate_bands } => {
                        check_rate_bands(rate_bands, &format!("{path}.rate_bands"), &mut issues);
                    }
                }
                if c.window.is_some_and(|w| w.seconds() <= 0) {
                    issues.push(TariffIssue::new(format!("{path}.window"), "must be > 0"));
                }
            }
            Charge::TimeOfUse(c) => {
                check_rate(c.rate, &format!("{path}.rate"), &mut issues);
                check_time_of_day(&c.time, &format!("{path}.time"), &mut issues);
            }
            Charge::Seasonal(c) => {
                check_rate(c.rate, &format!("{path}.rate"), &mut issues);
                check_season(&c.season, &format!("{path}.season"), &mut issues);
            }
            Charge::Scheduled(c) => {
                check_schedule(&c.rate_schedule, &format!("{path}.rate_schedule"), &mut issues);
            }
            Charge::Flat(c) => {
                check_rate(c.rate, &format!("{path}.rate"), &mut issues);
            }
        }
    }

    issues
}

fn check_rate(rate: f64, field: &str, issues: &mut Vec<TariffIssue>) {
    if !rate.is_finite() {
        issues.push(TariffIssue::new(field, "must be a finite number"));
    }
}

fn check_rate_bands(bands: &[RateBand], field: &str, issues: &mut Vec<TariffIssue>) {
    let Some((last, leading)) = bands.split_last() else {
        issues.push(TariffIssue::new(field, "must contain at least one band"));
        return;
    };

    let mut prior: Option<f64> = None;
    for (i, band) in leading.iter().enumerate() {
        check_rate(band.rate, &format!("{field}[{i}].rate"), issues);
        let Some(limit) = band.limit else {
            issues.push(TariffIssue::new(
                format!("{field}[{i}].limit"),
                "only the final band may omit its limit",
            ));
            continue;
        };
        if !limit.is_finite() || limit <= 0.0 {
            issues.push(TariffIssue::new(
                format!("{field}[{i}].limit"),
                "must be a finite number > 0",
            ));
        } else if prior.is_some_and(|p| limit <= p) {
            issues.push(TariffIssue::new(
                format!("{field}[{i}].limit"),
                "limits must be strictly ascending",
            ));
        }
        prior = Some(limit);
    }

    let last_index = leading.len();
    check_rate(last.rate, &format!("{field}[{last_index}].rate"), issues);
    if last.limit.is_some() {
        issues.push(TariffIssue::new(
            format!("{field}[{last_index}].limit"),
            "the final band must be unbounded (omit limit)",
        ));
    }
}

fn check_time_of_day(time: &TimeOfDay, field: &str, issues: &mut Vec<TariffIssue>) {
    if time.periods.is_empty() {
        issues.push(TariffIssue::new(
            format!("{field}.periods"),
            "must contain at least one period",
        ));
    }
    for (i, p) in time.periods.iter().enumerate() {
        let path = format!("{field}.periods[{i}]");
        let checks = [
            ("from_weekday", Some(p.from_weekday), 6),
            ("to_weekday", Some(p.to_weekday), 6),
            ("from_hour", p.from_hour, 23),
            ("to_hour", p.to_hour, 23),
            ("from_minute", p.from_minute, 59),
            ("to_minute", p.to_minute, 59),
        ];
        for (name, value, max) in checks {
            if value.is_some_and(|v| v > max) {
                issues.push(TariffIssue::new(
                    format!("{path}.{name}"),
                    format!("must be in [0, {max}]"),
                ));
            }
        }
    }
}

fn check_season(season: &Season, field: &str, issues: &mut Vec<TariffIssue>) {
    for (name, month, day) in [
        ("from", season.from_month, season.from_day),
        ("to", season.to_month, season.to_day),
    ] {
        // 2000 is a leap year, so 29 February is accepted.
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            issues.push(TariffIssue::new(
                format!("{field}.{name}_month"),
                format!("{month}/{day} is not a calendar date"),
            ));
        }
    }
}

fn check_schedule(schedule: &[ScheduleEntry], field: &str, issues: &mut Vec<TariffIssue>) {
    if schedule.is_empty() {
        issues.push(TariffIssue::new(field, "must contain at least one entry"));
    }
    for (i, entry) in schedule.iter().enumerate() {
        check_rate(entry.rate, &format!("{field}[{i}].rate"), issues);
    }
    if let Some(i) = schedule
        .windows(2)
        .position(|pair| pair[1].datetime < pair[0].datetime)
    {
        issues.push(TariffIssue::new(
            format!("{field}[{}].datetime", i + 1),
            "entries must be sorted ascending by datetime",
        ));
    }
}
