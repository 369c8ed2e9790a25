//! Serialized tariff documents (TOML or JSON) and their conversion into [`Tariff`].
//!
//! A charge may carry an explicit `type`; without one its kind is inferred
//! from which fields it sets.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{TariffError, TariffIssue};

use super::charge::{
    Charge, ChargeKind, ConsumptionCharge, DemandCharge, DemandPricing, FlatCharge, RateBand,
    ScheduleEntry, ScheduledCharge, Season, SeasonalCharge, TimeOfDay, TimeOfUseCharge,
};
use super::window::DemandWindow;
use super::{BillingPeriod, ChannelDefaults, Tariff, TariffSettings};

/// Top-level tariff document.
///
/// All settings have defaults; only `charges` is required to be non-empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffDocument {
    pub service: String,
    #[serde(alias = "energy_unit")]
    pub consumption_unit: String,
    pub demand_unit: String,
    pub billing_period: BillingPeriod,
    pub demand_window: DemandWindow,
    /// Overrides the default energy channel name.
    pub energy_channel: Option<String>,
    /// Overrides the default power channel name.
    pub power_channel: Option<String>,
    pub charges: Vec<ChargeDocument>,
}

impl Default for TariffDocument {
    fn default() -> Self {
        let settings = TariffSettings::default();
        Self {
            service: settings.service,
            consumption_unit: settings.consumption_unit,
            demand_unit: settings.demand_unit,
            billing_period: settings.billing_period,
            demand_window: settings.demand_window,
            energy_channel: None,
            power_channel: None,
            charges: Vec::new(),
        }
    }
}

/// One charge as written in a document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChargeDocument {
    #[serde(rename = "type")]
    pub kind: Option<ChargeKind>,
    #[serde(alias = "channel")]
    pub meter: Option<String>,
    pub rate: Option<f64>,
    pub rate_bands: Option<Vec<RateBand>>,
    pub time: Option<TimeOfDay>,
    pub season: Option<Season>,
    pub rate_schedule: Option<Vec<ScheduleEntry>>,
    pub window: Option<DemandWindow>,
}

impl TariffDocument {
    /// Parses a document from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::Parse`] if the TOML is invalid or has unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, TariffError> {
        toml::from_str(s).map_err(|e| TariffError::Parse(e.to_string()))
    }

    /// Parses a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::Parse`] if the JSON is invalid or has unknown fields.
    pub fn from_json_str(s: &str) -> Result<Self, TariffError> {
        serde_json::from_str(s).map_err(|e| TariffError::Parse(e.to_string()))
    }

    /// Converts the document into a validated [`Tariff`].
    ///
    /// # Errors
    ///
    /// Returns [`TariffError::Malformed`] listing every charge that cannot be
    /// resolved, or every validation problem of the resulting tariff.
    pub fn into_tariff(self) -> Result<Tariff, TariffError> {
        let defaults = ChannelDefaults::default();
        let settings = TariffSettings {
            service: self.service,
            consumption_unit: self.consumption_unit,
            demand_unit: self.demand_unit,
            billing_period: self.billing_period,
            demand_window: self.demand_window,
            channels: ChannelDefaults {
                energy: self.energy_channel.unwrap_or(defaults.energy),
                power: self.power_channel.unwrap_or(defaults.power),
            },
        };

        let mut issues = Vec::new();
        let mut charges = Vec::with_capacity(self.charges.len());
        for (i, doc) in self.charges.into_iter().enumerate() {
            match doc.into_charge(&format!("charges[{i}]")) {
                Ok(charge) => charges.push(charge),
                Err(mut charge_issues) => issues.append(&mut charge_issues),
            }
        }
        if !issues.is_empty() {
            return Err(TariffError::Malformed(issues));
        }

        Tariff::new(settings, charges)
    }
}

impl ChargeDocument {
    /// Kind implied by the fields present, most specific first.
    fn inferred_kind(&self) -> Option<ChargeKind> {
        if self.rate_schedule.is_some() {
            Some(ChargeKind::Scheduled)
        } else if self.time.is_some() {
            Some(ChargeKind::TimeOfUse)
        } else if self.season.is_some() {
            Some(ChargeKind::Seasonal)
        } else if self.rate_bands.is_some() {
            Some(ChargeKind::Consumption)
        } else if self.rate.is_some() {
            Some(ChargeKind::Flat)
        } else {
            None
        }
    }

    fn present_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.rate.is_some() {
            fields.push("rate");
        }
        if self.rate_bands.is_some() {
            fields.push("rate_bands");
        }
        if self.time.is_some() {
            fields.push("time");
        }
        if self.season.is_some() {
            fields.push("season");
        }
        if self.rate_schedule.is_some() {
            fields.push("rate_schedule");
        }
        if self.window.is_some() {
            fields.push("window");
        }
        fields
    }

    fn into_charge(self, path: &str) -> Result<Charge, Vec<TariffIssue>> {
        let Some(kind) = self.kind.or_else(|| self.inferred_kind()) else {
            return Err(vec![TariffIssue::new(
                path,
                "cannot infer charge type; set `type` or one of rate, rate_bands, time, season, rate_schedule",
            )]);
        };

        let (allowed, required): (&[&str], &str) = match kind {
            ChargeKind::Consumption => (&["rate_bands"], "rate_bands"),
            ChargeKind::Demand => (&["rate", "rate_bands", "window"], "rate or rate_bands"),
            ChargeKind::TimeOfUse => (&["rate", "time"], "rate and time"),
            ChargeKind::Seasonal => (&["rate", "season"], "rate and season"),
            ChargeKind::Scheduled => (&["rate_schedule"], "rate_schedule"),
            ChargeKind::Flat => (&["rate"], "rate"),
        };

        let mut issues: Vec<TariffIssue> = self
            .present_fields()
            .into_iter()
            .filter(|field| !allowed.contains(field))
            .map(|field| {
                TariffIssue::new(
                    format!("{path}.{field}"),
                    format!("not applicable to a {kind} charge"),
                )
            })
            .collect();

        let mut conflicting = false;
        let channel = self.meter;
        let charge = match kind {
            ChargeKind::Consumption => self
                .rate_bands
                .map(|rate_bands| Charge::Consumption(ConsumptionCharge { channel, rate_bands })),
            ChargeKind::Demand => {
                let pricing = match (self.rate, self.rate_bands) {
                    (Some(rate), None) => Some(DemandPricing::Flat { rate }),
                    (None, Some(rate_bands)) => Some(DemandPricing::Banded { rate_bands }),
                    (Some(_), Some(_)) => {
                        conflicting = true;
                        issues.push(TariffIssue::new(
                            format!("{path}.rate"),
                            "set either rate or rate_bands, not both",
                        ));
                        None
                    }
                    (None, None) => None,
                };
                pricing.map(|pricing| {
                    Charge::Demand(DemandCharge {
                        channel,
                        pricing,
                        window: self.window,
                    })
                })
            }
            ChargeKind::TimeOfUse => match (self.rate, self.time) {
                (Some(rate), Some(time)) => {
                    Some(Charge::TimeOfUse(TimeOfUseCharge { channel, rate, time }))
                }
                _ => None,
            },
            ChargeKind::Seasonal => match (self.rate, self.season) {
                (Some(rate), Some(season)) => Some(Charge::Seasonal(SeasonalCharge {
                    channel,
                    rate,
                    season,
                })),
                _ => None,
            },
            ChargeKind::Scheduled => self.rate_schedule.map(|rate_schedule| {
                Charge::Scheduled(ScheduledCharge {
                    channel,
                    rate_schedule,
                })
            }),
            ChargeKind::Flat => self.rate.map(|rate| Charge::Flat(FlatCharge { channel, rate })),
        };

        match charge {
            Some(charge) if issues.is_empty() => Ok(charge),
            Some(_) => Err(issues),
            None => {
                if !conflicting {
                    issues.push(TariffIssue::new(
                        path,
                        format!("a {kind} charge requires {required}"),
                    ));
                }
                Err(issues)
            }
        }
    }
}

impl Tariff {
    /// Loads a tariff document from disk.
    ///
    /// Files ending in `.json` are read as JSON; anything else as TOML.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a `.toml` or `.json` tariff document
    ///
    /// # Errors
    ///
    /// Returns a [`TariffError`] if the file cannot be read, parsed, or validated.
    pub fn from_path(path: &Path) -> Result<Self, TariffError> {
        let content = fs::read_to_string(path).map_err(|source| TariffError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let doc = if is_json {
            TariffDocument::from_json_str(&content)?
        } else {
            TariffDocument::from_toml_str(&content)?
        };
        doc.into_tariff()
    }

    /// Parses and validates a TOML tariff document.
    ///
    /// # Errors
    ///
    /// Returns a [`TariffError`] if the TOML is invalid or the tariff is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self, TariffError> {
        TariffDocument::from_toml_str(s)?.into_tariff()
    }

    /// Parses and validates a JSON tariff document.
    ///
    /// # Errors
    ///
    /// Returns a [`TariffError`] if the JSON is invalid or the tariff is malformed.
    pub fn from_json_str(s: &str) -> Result<Self, TariffError> {
        TariffDocument::from_json_str(s)?.into_tariff()
    }
}
