//! Demand resampling: peak power per fixed window.

use std::ops::Range;

use chrono::{DateTime, NaiveDateTime, NaiveTime};

use crate::tariff::DemandWindow;

/// Maximum reading observed in one resampling window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPeak {
    /// Window start, a whole number of windows after the series' first midnight.
    pub start: NaiveDateTime,
    pub value: f64,
}

/// Resamples `values[range]` into non-overlapping windows, keeping each
/// window's maximum present reading.
///
/// Windows start at midnight of the day of `timestamps[0]` and step by the
/// window length, so every bucket of one series shares the same grid.
/// Windows without any present (non-NaN) reading are omitted. `timestamps`
/// must be sorted, so windows come out in order.
pub fn window_maxima(
    timestamps: &[NaiveDateTime],
    values: &[f64],
    range: Range<usize>,
    window: DemandWindow,
) -> Vec<WindowPeak> {
    let width = window.seconds().max(1);
    let origin = timestamps
        .first()
        .map_or(0, |t| t.date().and_time(NaiveTime::MIN).and_utc().timestamp());
    let mut peaks: Vec<WindowPeak> = Vec::new();
    let mut current: Option<i64> = None;

    for i in range {
        let (Some(ts), Some(&value)) = (timestamps.get(i), values.get(i)) else {
            break;
        };
        if value.is_nan() {
            continue;
        }
        let secs = ts.and_utc().timestamp();
        let key = origin + (secs - origin).div_euclid(width) * width;
        match peaks.last_mut() {
            Some(peak) if current == Some(key) => peak.value = peak.value.max(value),
            _ => {
                let start = DateTime::from_timestamp(key, 0).map_or(*ts, |d| d.naive_utc());
                peaks.push(WindowPeak { start, value });
                current = Some(key);
            }
        }
    }
    peaks
}

/// Highest window maximum in `values[range]`, or `None` when nothing is present.
pub fn peak(
    timestamps: &[NaiveDateTime],
    values: &[f64],
    range: Range<usize>,
    window: DemandWindow,
) -> Option<f64> {
    window_maxima(timestamps, values, range, window)
        .into_iter()
        .map(|w| w.value)
        .reduce(f64::max)
}
