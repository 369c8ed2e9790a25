//! API request and response types.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::rating::resolve_channel;
use crate::tariff::{BillingPeriod, ChargeKind, Tariff};

/// Tariff overview returned by `GET /tariff`.
#[derive(Debug, Serialize)]
pub struct TariffSummary {
    pub service: String,
    pub consumption_unit: String,
    pub demand_unit: String,
    pub billing_period: BillingPeriod,
    /// Default demand window, e.g. `"15min"`.
    pub demand_window: String,
    pub charges: Vec<ChargeSummary>,
}

/// One charge with the channel it will read.
#[derive(Debug, Serialize)]
pub struct ChargeSummary {
    pub index: usize,
    pub kind: ChargeKind,
    pub label: String,
    pub channel: String,
}

impl From<&Tariff> for TariffSummary {
    fn from(t: &Tariff) -> Self {
        Self {
            service: t.service().to_string(),
            consumption_unit: t.consumption_unit().to_string(),
            demand_unit: t.demand_unit().to_string(),
            billing_period: t.billing_period(),
            demand_window: t.demand_window().to_string(),
            charges: t
                .charges()
                .iter()
                .enumerate()
                .map(|(index, charge)| ChargeSummary {
                    index,
                    kind: charge.kind(),
                    label: charge.label().to_string(),
                    channel: resolve_channel(charge, t.channels()).to_string(),
                })
                .collect(),
        }
    }
}

/// Body of `POST /bill`: meter rows in timestamp order.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BillRequest {
    pub rows: Vec<ReadingRow>,
}

/// One timestamp and its readings keyed by channel name.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadingRow {
    #[serde(deserialize_with = "crate::timestamp::deserialize")]
    pub datetime: NaiveDateTime,
    /// A channel absent from a row is a missing reading.
    #[serde(default)]
    pub readings: BTreeMap<String, f64>,
}

/// Error response body for 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
