//! Rating: applying a [`Tariff`](crate::tariff::Tariff) to a
//! [`MeterSeries`](crate::meter::MeterSeries).
//!
//! Charges are rated independently and summed in tariff order. Tiered
//! consumption and demand charges accumulate per billing period
//! ([`period::partition`]); the other kinds rate each sample on its own.

pub mod bill;
pub mod calendar;
pub mod demand;
pub mod engine;
pub mod period;
mod schedule;
pub mod tiers;

pub use bill::{Bill, LineItem, PeriodAmount};
pub use engine::{apply, bill, resolve_channel};
