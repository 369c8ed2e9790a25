//! Rate lookup for scheduled charges.

use chrono::NaiveDateTime;

use crate::tariff::ScheduledCharge;

impl ScheduledCharge {
    /// Rate in force at `ts`: the latest entry with `datetime <= ts`.
    ///
    /// Returns `None` before the first entry, which rates as zero.
    pub fn rate_at(&self, ts: &NaiveDateTime) -> Option<f64> {
        let idx = self
            .rate_schedule
            .partition_point(|entry| entry.datetime <= *ts);
        idx.checked_sub(1).map(|i| self.rate_schedule[i].rate)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::tariff::ScheduleEntry;

    fn jan(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2018, 1, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
    }

    fn schedule() -> ScheduledCharge {
        ScheduledCharge {
            channel: None,
            rate_schedule: vec![
                ScheduleEntry {
                    datetime: jan(2, 0),
                    rate: 0.10,
                },
                ScheduleEntry {
                    datetime: jan(3, 0),
                    rate: 0.25,
                },
            ],
        }
    }

    #[test]
    fn before_first_entry_has_no_rate() {
        assert_eq!(schedule().rate_at(&jan(1, 23)), None);
    }

    #[test]
    fn entry_takes_effect_at_its_datetime() {
        let s = schedule();
        assert_eq!(s.rate_at(&jan(2, 0)), Some(0.10));
        assert_eq!(s.rate_at(&jan(2, 23)), Some(0.10));
        assert_eq!(s.rate_at(&jan(3, 0)), Some(0.25));
        assert_eq!(s.rate_at(&jan(20, 0)), Some(0.25));
    }
}
