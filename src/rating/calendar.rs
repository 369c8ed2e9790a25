//! Calendar classifiers for time-of-use periods and seasons.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::tariff::{Season, TimeOfDay, TimePeriod};

/// Inclusive range test that wraps when `from > to` (e.g. Sat..Mon).
fn in_wrapping_range<T: PartialOrd>(value: T, from: T, to: T) -> bool {
    if from <= to {
        from <= value && value <= to
    } else {
        value >= from || value <= to
    }
}

impl TimePeriod {
    /// Returns `true` if `ts` falls on one of the period's weekdays and inside
    /// its time-of-day range, at minute resolution.
    pub fn matches(&self, ts: &NaiveDateTime) -> bool {
        let weekday = ts.weekday().num_days_from_monday();
        if !in_wrapping_range(weekday, self.from_weekday, self.to_weekday) {
            return false;
        }
        let minute_of_day = ts.hour() * 60 + ts.minute();
        in_wrapping_range(
            minute_of_day,
            self.from_minute_of_day(),
            self.to_minute_of_day(),
        )
    }
}

impl TimeOfDay {
    /// Returns `true` if `ts` matches any of the periods.
    pub fn matches(&self, ts: &NaiveDateTime) -> bool {
        self.periods.iter().any(|p| p.matches(ts))
    }
}

impl Season {
    /// Returns `true` if the month/day of `ts` is inside the season, ignoring year.
    pub fn matches(&self, ts: &NaiveDateTime) -> bool {
        in_wrapping_range(
            (ts.month(), ts.day()),
            (self.from_month, self.from_day),
            (self.to_month, self.to_day),
        )
    }
}
