//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tariff_rater::meter::MeterSeries;
use tariff_rater::tariff::Tariff;

pub const ENERGY: &str = "imported energy (kwh)";
pub const POWER: &str = "imported power (kw)";
pub const EXPORTED: &str = "electricity_exported";

/// Quarter-hour samples in a non-leap year.
pub const YEAR_SAMPLES: usize = 365 * 96;

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("valid fixture datetime")
}

/// `n` samples every `step_minutes` starting at `start`.
pub fn timestamps(start: NaiveDateTime, step_minutes: i64, n: usize) -> Vec<NaiveDateTime> {
    (0..n as i64)
        .map(|i| start + TimeDelta::minutes(step_minutes * i))
        .collect()
}

/// Calendar year 2018 at 15-minute resolution with every channel reading 1.0.
///
/// Mirrors the reference load fixture: 35,040 samples on the energy, power
/// and export channels.
pub fn fixture_year() -> MeterSeries {
    let ts = timestamps(at(2018, 1, 1, 0, 0), 15, YEAR_SAMPLES);
    MeterSeries::new(ts)
        .and_then(|s| s.with_channel(ENERGY, vec![1.0; YEAR_SAMPLES]))
        .and_then(|s| s.with_channel(POWER, vec![1.0; YEAR_SAMPLES]))
        .and_then(|s| s.with_channel(EXPORTED, vec![1.0; YEAR_SAMPLES]))
        .and_then(|s| s.with_channel("electricity_imported", vec![1.0; YEAR_SAMPLES]))
        .expect("fixture series is well formed")
}

/// Series over `ts` with a single channel.
pub fn series(ts: Vec<NaiveDateTime>, channel: &str, values: Vec<f64>) -> MeterSeries {
    MeterSeries::new(ts)
        .and_then(|s| s.with_channel(channel, values))
        .expect("series is well formed")
}

pub fn json_tariff(doc: &str) -> Tariff {
    Tariff::from_json_str(doc).expect("tariff document is valid")
}

pub fn approx_eq(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}
