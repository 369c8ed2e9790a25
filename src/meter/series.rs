//! Columnar meter series: timestamps plus named reading channels.

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::NaiveDateTime;

use crate::error::SeriesError;

/// An ordered set of timestamped rows, stored column-wise.
///
/// Each channel holds exactly one reading per timestamp. A missing reading is
/// stored as `NaN` and skipped by every sum and maximum the engine takes.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tariff_rater::meter::MeterSeries;
///
/// let t0 = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let t1 = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap().and_hms_opt(0, 15, 0).unwrap();
/// let series = MeterSeries::new(vec![t0, t1])
///     .and_then(|s| s.with_channel("imported energy (kwh)", vec![1.0, 2.0]))
///     .unwrap();
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.channel("imported energy (kwh)"), Some(&[1.0, 2.0][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeterSeries {
    timestamps: Vec<NaiveDateTime>,
    channels: BTreeMap<String, Vec<f64>>,
}

impl MeterSeries {
    /// Creates a series with the given timestamps and no channels.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Unordered`] if any timestamp is earlier than its predecessor.
    pub fn new(timestamps: Vec<NaiveDateTime>) -> Result<Self, SeriesError> {
        if let Some(index) = timestamps
            .windows(2)
            .position(|pair| pair[1] < pair[0])
            .map(|i| i + 1)
        {
            return Err(SeriesError::Unordered { index });
        }
        Ok(Self {
            timestamps,
            channels: BTreeMap::new(),
        })
    }

    /// Adds (or replaces) a channel.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] if `values` does not have one
    /// reading per timestamp.
    pub fn with_channel(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let name = name.into();
        if values.len() != self.timestamps.len() {
            return Err(SeriesError::LengthMismatch {
                channel: name,
                expected: self.timestamps.len(),
                found: values.len(),
            });
        }
        self.channels.insert(name, values);
        Ok(self)
    }

    /// Builds a series from row-oriented readings.
    ///
    /// The channel set is the union over all rows; a channel absent from a
    /// row reads `NaN` there.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Unordered`] if the rows are not in timestamp order.
    pub fn from_rows<I>(rows: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (NaiveDateTime, BTreeMap<String, f64>)>,
    {
        let rows: Vec<_> = rows.into_iter().collect();
        let mut channels: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (_, readings) in &rows {
            for name in readings.keys() {
                channels
                    .entry(name.clone())
                    .or_insert_with(|| vec![f64::NAN; rows.len()]);
            }
        }
        for (i, (_, readings)) in rows.iter().enumerate() {
            for (name, value) in readings {
                if let Some(column) = channels.get_mut(name) {
                    column[i] = *value;
                }
            }
        }

        let timestamps = rows.into_iter().map(|(ts, _)| ts).collect();
        let mut series = Self::new(timestamps)?;
        series.channels = channels;
        Ok(series)
    }

    /// Sample timestamps in order.
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    /// Readings for `name`, if the channel exists.
    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.channels.get(name).map(Vec::as_slice)
    }

    /// Channel names in sorted order.
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns `true` if the series has no samples.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Sum of the present (non-`NaN`) readings in `range`.
pub(crate) fn present_sum(values: &[f64], range: Range<usize>) -> f64 {
    values[range].iter().filter(|v| !v.is_nan()).sum()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 3, 1)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    #[test]
    fn rejects_unordered_timestamps() {
        let err = MeterSeries::new(vec![ts(1), ts(2), ts(0)]).unwrap_err();
        assert!(matches!(err, SeriesError::Unordered { index: 2 }));
    }

    #[test]
    fn equal_timestamps_are_allowed() {
        assert!(MeterSeries::new(vec![ts(1), ts(1), ts(2)]).is_ok());
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = MeterSeries::new(vec![ts(0), ts(1)])
            .and_then(|s| s.with_channel("a", vec![1.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            SeriesError::LengthMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn from_rows_fills_gaps_with_nan() {
        let rows = vec![
            (ts(0), BTreeMap::from([("a".to_string(), 1.0)])),
            (ts(1), BTreeMap::from([("b".to_string(), 2.0)])),
        ];
        let series = MeterSeries::from_rows(rows).unwrap();
        let a = series.channel("a").unwrap();
        assert_eq!(a[0], 1.0);
        assert!(a[1].is_nan());
        assert_eq!(series.channel_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn present_sum_skips_nan() {
        let values = [1.0, f64::NAN, 2.5];
        assert_eq!(present_sum(&values, 0..3), 3.5);
        assert_eq!(present_sum(&values, 1..2), 0.0);
    }

    #[test]
    fn empty_series() {
        let series = MeterSeries::new(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.len(), 0);
    }
}
