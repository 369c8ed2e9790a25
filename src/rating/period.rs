//! Billing-period partitioning on calendar boundaries.

use std::ops::Range;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::tariff::BillingPeriod;

/// A half-open `[start, end)` billing period and the samples inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingBucket {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Indices into the series' timestamps.
    pub samples: Range<usize>,
}

/// Splits sorted `timestamps` into contiguous billing buckets.
///
/// Buckets cover every sample exactly once. Monthly and annual buckets are
/// bounded by true calendar edges; `None` yields a single bucket spanning
/// the series. An empty input yields no buckets.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tariff_rater::rating::period::partition;
/// use tariff_rater::tariff::BillingPeriod;
///
/// let jan = NaiveDate::from_ymd_opt(2018, 1, 31).unwrap().and_hms_opt(23, 45, 0).unwrap();
/// let feb = NaiveDate::from_ymd_opt(2018, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let buckets = partition(BillingPeriod::Monthly, &[jan, feb]);
/// assert_eq!(buckets.len(), 2);
/// assert_eq!(buckets[0].end, feb);
/// ```
pub fn partition(period: BillingPeriod, timestamps: &[NaiveDateTime]) -> Vec<BillingBucket> {
    let (Some(first), Some(last)) = (timestamps.first(), timestamps.last()) else {
        return Vec::new();
    };

    match period {
        BillingPeriod::None => vec![BillingBucket {
            start: *first,
            // Smallest half-open bound that still contains the last sample.
            end: *last + TimeDelta::nanoseconds(1),
            samples: 0..timestamps.len(),
        }],
        BillingPeriod::Monthly => split_by(timestamps, |ts| month_bounds(ts.date())),
        BillingPeriod::Annual => split_by(timestamps, |ts| year_bounds(ts.date())),
    }
}

/// Groups consecutive samples that share the same calendar bounds.
fn split_by(
    timestamps: &[NaiveDateTime],
    bounds: impl Fn(&NaiveDateTime) -> (NaiveDateTime, NaiveDateTime),
) -> Vec<BillingBucket> {
    let mut buckets: Vec<BillingBucket> = Vec::new();
    for (i, ts) in timestamps.iter().enumerate() {
        match buckets.last_mut() {
            Some(bucket) if *ts < bucket.end => bucket.samples.end = i + 1,
            _ => {
                let (start, end) = bounds(ts);
                buckets.push(BillingBucket {
                    start,
                    end,
                    samples: i..i + 1,
                });
            }
        }
    }
    buckets
}

fn month_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date - Days::new(u64::from(date.day0()));
    let end = start + Months::new(1);
    (start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
}

fn year_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date - Days::new(u64::from(date.ordinal0()));
    let end = start + Months::new(12);
    (start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
}
