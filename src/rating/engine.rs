//! Rating engine: resolves channels, runs each charge, sums the results.

use chrono::NaiveDateTime;
use tracing::debug;

use super::bill::{Bill, LineItem, PeriodAmount};
use super::period::{BillingBucket, partition};
use super::{demand, tiers};
use crate::error::RatingError;
use crate::meter::{MeterSeries, present_sum};
use crate::tariff::{ChannelDefaults, Charge, DemandCharge, DemandPricing, DemandWindow, Tariff};

/// Channel a charge reads: its own override, else the tariff default for its kind.
pub fn resolve_channel<'a>(charge: &'a Charge, defaults: &'a ChannelDefaults) -> &'a str {
    let default = if charge.reads_power() {
        defaults.power.as_str()
    } else {
        defaults.energy.as_str()
    };
    charge.channel().unwrap_or(default)
}

/// Rates `series` against every charge of `tariff`, in order.
///
/// An empty series rates to zero for every charge.
///
/// # Arguments
///
/// * `tariff` - Validated tariff whose charges are applied in order
/// * `series` - Meter readings to rate
///
/// # Errors
///
/// Returns [`RatingError::MissingChannel`] for the first charge whose channel
/// is not in a non-empty series. No partial bill is produced.
pub fn bill(tariff: &Tariff, series: &MeterSeries) -> Result<Bill, RatingError> {
    let timestamps = series.timestamps();
    let buckets = partition(tariff.billing_period(), timestamps);
    let mut items = Vec::with_capacity(tariff.charges().len());

    for (index, charge) in tariff.charges().iter().enumerate() {
        let channel = resolve_channel(charge, tariff.channels());
        let values = match series.channel(channel) {
            Some(values) => values,
            None if series.is_empty() => &[][..],
            None => {
                return Err(RatingError::MissingChannel {
                    index,
                    kind: charge.kind(),
                    channel: channel.to_string(),
                });
            }
        };

        let rated = Rated::compute(charge, timestamps, values, &buckets, tariff.demand_window());
        for period in &rated.periods {
            debug!(
                index,
                start = %period.start,
                end = %period.end,
                quantity = period.quantity,
                amount = period.amount,
                "billing period"
            );
        }
        debug!(index, kind = %charge.kind(), channel, amount = rated.amount, "rated charge");

        items.push(LineItem {
            index,
            kind: charge.kind(),
            label: charge.label().to_string(),
            channel: channel.to_string(),
            amount: rated.amount,
            periods: rated.periods,
        });
    }

    let bill = Bill { items };
    debug!(charges = bill.items.len(), total = bill.total(), "rated tariff");
    Ok(bill)
}

/// Total amount of rating `series` against `tariff`.
///
/// # Errors
///
/// See [`bill`].
pub fn apply(tariff: &Tariff, series: &MeterSeries) -> Result<f64, RatingError> {
    Ok(bill(tariff, series)?.total())
}

/// Amount of one charge plus its per-period breakdown where it has one.
struct Rated {
    amount: f64,
    periods: Vec<PeriodAmount>,
}

impl Rated {
    fn flat(amount: f64) -> Self {
        Self {
            amount,
            periods: Vec::new(),
        }
    }

    fn from_periods(periods: Vec<PeriodAmount>) -> Self {
        Self {
            amount: periods.iter().map(|p| p.amount).sum(),
            periods,
        }
    }

    fn compute(
        charge: &Charge,
        timestamps: &[NaiveDateTime],
        values: &[f64],
        buckets: &[BillingBucket],
        default_window: DemandWindow,
    ) -> Self {
        let samples = || timestamps.iter().zip(values).filter(|(_, v)| !v.is_nan());
        match charge {
            Charge::Consumption(c) => Self::from_periods(
                buckets
                    .iter()
                    .map(|bucket| {
                        let usage = present_sum(values, bucket.samples.clone());
                        period_amount(bucket, usage, tiers::amount(&c.rate_bands, usage))
                    })
                    .collect(),
            ),
            Charge::Demand(c) => Self::from_periods(
                buckets
                    .iter()
                    .map(|bucket| demand_period(c, timestamps, values, bucket, default_window))
                    .collect(),
            ),
            Charge::TimeOfUse(c) => {
                let usage: f64 = samples()
                    .filter(|(ts, _)| c.time.matches(ts))
                    .map(|(_, v)| v)
                    .sum();
                Self::flat(c.rate * usage)
            }
            Charge::Seasonal(c) => {
                let usage: f64 = samples()
                    .filter(|(ts, _)| c.season.matches(ts))
                    .map(|(_, v)| v)
                    .sum();
                Self::flat(c.rate * usage)
            }
            Charge::Scheduled(c) => Self::flat(
                samples()
                    .map(|(ts, v)| c.rate_at(ts).map_or(0.0, |rate| rate * v))
                    .sum(),
            ),
            Charge::Flat(c) => Self::flat(c.rate * present_sum(values, 0..values.len())),
        }
    }
}

fn demand_period(
    charge: &DemandCharge,
    timestamps: &[NaiveDateTime],
    values: &[f64],
    bucket: &BillingBucket,
    default_window: DemandWindow,
) -> PeriodAmount {
    let window = charge.window.unwrap_or(default_window);
    let Some(peak) = demand::peak(timestamps, values, bucket.samples.clone(), window) else {
        return period_amount(bucket, 0.0, 0.0);
    };
    let amount = match &charge.pricing {
        DemandPricing::Flat { rate } => rate * peak,
        DemandPricing::Banded { rate_bands } => tiers::amount(rate_bands, peak),
    };
    period_amount(bucket, peak, amount)
}

fn period_amount(bucket: &BillingBucket, quantity: f64, amount: f64) -> PeriodAmount {
    PeriodAmount {
        start: bucket.start,
        end: bucket.end,
        quantity,
        amount,
    }
}
