//! Seeded property checks on the rating laws.

mod common;

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{ENERGY, POWER, approx_eq, at, series, timestamps};
use tariff_rater::meter::MeterSeries;
use tariff_rater::rating::period::partition;
use tariff_rater::rating::{apply, bill, tiers};
use tariff_rater::tariff::{
    BillingPeriod, Charge, ConsumptionCharge, DemandCharge, DemandPricing, DemandWindow,
    FlatCharge, RateBand, ScheduleEntry, ScheduledCharge, Season, SeasonalCharge, Tariff,
    TariffSettings, TimeOfDay, TimeOfUseCharge, TimePeriod,
};

const CASES: usize = 200;

fn random_bands(rng: &mut StdRng) -> Vec<RateBand> {
    let count = rng.random_range(0..4);
    let mut limit = 0.0;
    let mut bands = Vec::new();
    for _ in 0..count {
        limit += rng.random_range(1.0..500.0);
        bands.push(RateBand::limited(limit, rng.random_range(0.0..1.0)));
    }
    bands.push(RateBand::unbounded(rng.random_range(0.0..1.0)));
    bands
}

fn random_series(rng: &mut StdRng, days: usize) -> MeterSeries {
    let n = days * 96;
    let values = (0..n).map(|_| rng.random_range(0.0..5.0)).collect();
    series(timestamps(at(2019, 11, 20, 0, 0), 15, n), ENERGY, values)
}

fn tariff(period: BillingPeriod, charges: Vec<Charge>) -> Tariff {
    Tariff::new(
        TariffSettings {
            billing_period: period,
            ..TariffSettings::default()
        },
        charges,
    )
    .unwrap()
}

#[test]
fn tiers_cover_usage_exactly() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..CASES {
        let bands = random_bands(&mut rng);
        let usage = rng.random_range(0.0..3000.0);
        let split = tiers::split(&bands, usage);
        let covered: f64 = split.iter().sum();
        assert!((covered - usage).abs() < 1e-9, "{covered} vs {usage}");

        let mut prior = 0.0;
        for (consumed, band) in split.iter().zip(&bands) {
            assert!(*consumed >= 0.0);
            if let Some(limit) = band.limit {
                assert!(*consumed <= limit - prior + 1e-9);
                prior = limit;
            }
        }
    }
}

#[test]
fn tier_amount_is_monotonic_in_usage() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..CASES {
        let bands = random_bands(&mut rng);
        let a = rng.random_range(0.0..2000.0);
        let b = a + rng.random_range(0.0..2000.0);
        assert!(tiers::amount(&bands, a) <= tiers::amount(&bands, b) + 1e-9);
    }
}

#[test]
fn monthly_partition_is_exhaustive() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let days = rng.random_range(1..120);
        let s = random_series(&mut rng, days);
        let ts = s.timestamps();
        let buckets = partition(BillingPeriod::Monthly, ts);
        let mut next = 0;
        for b in &buckets {
            assert_eq!(b.samples.start, next);
            assert_eq!(b.start.day(), 1);
            assert_eq!(b.start.hour(), 0);
            assert_eq!(b.end.day(), 1);
            for i in b.samples.clone() {
                assert_eq!(ts[i].month(), b.start.month());
            }
            next = b.samples.end;
        }
        assert_eq!(next, ts.len());
    }
}

#[test]
fn annual_billing_resets_tiers_each_year() {
    // Two calendar years of 1 kWh per hour: 8760 kWh in each.
    let n = 2 * 8760;
    let s = series(timestamps(at(2018, 1, 1, 0, 0), 60, n), ENERGY, vec![1.0; n]);
    let charge = || {
        Charge::Consumption(ConsumptionCharge {
            channel: None,
            rate_bands: vec![RateBand::limited(5000.0, 0.1), RateBand::unbounded(0.2)],
        })
    };

    let annual = bill(&tariff(BillingPeriod::Annual, vec![charge()]), &s).unwrap();
    let periods = &annual.items[0].periods;
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].start, at(2018, 1, 1, 0, 0));
    assert_eq!(periods[0].end, at(2019, 1, 1, 0, 0));
    assert_eq!(periods[1].end, at(2020, 1, 1, 0, 0));
    assert_eq!(periods[0].quantity, 8760.0);
    assert_eq!(periods[1].quantity, 8760.0);
    let per_year = 5000.0 * 0.1 + 3760.0 * 0.2;
    assert!(approx_eq(annual.total(), 2.0 * per_year), "{}", annual.total());

    // One tier ladder over the whole series bills more of it at the upper rate.
    let whole = apply(&tariff(BillingPeriod::None, vec![charge()]), &s).unwrap();
    assert!(approx_eq(whole, 5000.0 * 0.1 + 12520.0 * 0.2), "{whole}");
}

#[test]
fn complementary_tou_periods_sum_to_flat() {
    let mut rng = StdRng::seed_from_u64(5);
    let s = random_series(&mut rng, 21);
    let weekday = |name: &str, from, to| {
        Charge::TimeOfUse(TimeOfUseCharge {
            channel: None,
            rate: 0.25,
            time: TimeOfDay {
                name: name.to_string(),
                periods: vec![TimePeriod::hours(0, 4, from, to)],
            },
        })
    };
    let weekend = Charge::TimeOfUse(TimeOfUseCharge {
        channel: None,
        rate: 0.25,
        time: TimeOfDay {
            name: "weekend".to_string(),
            periods: vec![TimePeriod::all_day(5, 6)],
        },
    });
    let split = tariff(
        BillingPeriod::Monthly,
        vec![
            weekday("day", 7, 21),
            // 22:00 through 06:59, wrapping midnight.
            weekday("night", 22, 6),
            weekend,
        ],
    );
    let flat = tariff(
        BillingPeriod::Monthly,
        vec![Charge::Flat(FlatCharge {
            channel: None,
            rate: 0.25,
        })],
    );
    let a = apply(&split, &s).unwrap();
    let b = apply(&flat, &s).unwrap();
    assert!((a - b).abs() < 1e-9, "{a} vs {b}");
}

#[test]
fn complementary_seasons_sum_to_flat() {
    let mut rng = StdRng::seed_from_u64(9);
    let s = random_series(&mut rng, 90);
    let season = |name: &str, from: (u32, u32), to: (u32, u32)| {
        Charge::Seasonal(SeasonalCharge {
            channel: None,
            rate: 2.0,
            season: Season {
                name: name.to_string(),
                from_month: from.0,
                from_day: from.1,
                to_month: to.0,
                to_day: to.1,
            },
        })
    };
    let split = tariff(
        BillingPeriod::None,
        vec![
            season("summer", (12, 1), (2, 29)),
            season("rest", (3, 1), (11, 30)),
        ],
    );
    let flat = tariff(
        BillingPeriod::None,
        vec![Charge::Flat(FlatCharge {
            channel: None,
            rate: 2.0,
        })],
    );
    let a = apply(&split, &s).unwrap();
    let b = apply(&flat, &s).unwrap();
    assert!((a - b).abs() < 1e-9 * b.abs().max(1.0), "{a} vs {b}");
}

#[test]
fn schedule_boundaries() {
    let ts = vec![
        at(2018, 1, 1, 23, 45),
        at(2018, 1, 2, 0, 0),
        at(2018, 1, 2, 0, 15),
        at(2018, 1, 3, 0, 0),
    ];
    let s = series(ts, ENERGY, vec![1.0, 1.0, 1.0, 1.0]);
    let charge = Charge::Scheduled(ScheduledCharge {
        channel: None,
        rate_schedule: vec![
            ScheduleEntry {
                datetime: at(2018, 1, 2, 0, 0),
                rate: 0.5,
            },
            ScheduleEntry {
                datetime: at(2018, 1, 3, 0, 0),
                rate: 2.0,
            },
        ],
    });
    // Before the first entry: 0; on and after: 0.5, 0.5; new entry: 2.0.
    assert_eq!(apply(&tariff(BillingPeriod::None, vec![charge]), &s).unwrap(), 3.0);
}

#[test]
fn demand_peak_never_exceeds_max_reading() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..20 {
        let n = rng.random_range(1..2000);
        let power: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..400.0)).collect();
        let max = power.iter().copied().fold(f64::MIN, f64::max);
        let minutes = rng.random_range(1..5) * 15;
        let s = series(timestamps(at(2018, 1, 1, 0, 0), 5, n), POWER, power);
        let charge = Charge::Demand(DemandCharge {
            channel: None,
            pricing: DemandPricing::Flat { rate: 1.0 },
            window: Some(DemandWindow::from_minutes(minutes)),
        });
        let b = bill(&tariff(BillingPeriod::Monthly, vec![charge]), &s).unwrap();
        for p in &b.items[0].periods {
            assert!(p.quantity <= max);
        }
        assert_eq!(
            b.items[0].periods.iter().map(|p| p.quantity).fold(f64::MIN, f64::max),
            max
        );
    }
}

#[test]
fn composition_is_additive() {
    let mut rng = StdRng::seed_from_u64(17);
    let s = random_series(&mut rng, 45);
    let charges = vec![
        Charge::Consumption(ConsumptionCharge {
            channel: None,
            rate_bands: random_bands(&mut rng),
        }),
        Charge::Flat(FlatCharge {
            channel: None,
            rate: 0.07,
        }),
        Charge::TimeOfUse(TimeOfUseCharge {
            channel: None,
            rate: 0.3,
            time: TimeOfDay {
                name: "peak".to_string(),
                periods: vec![TimePeriod::hours(0, 4, 16, 20)],
            },
        }),
    ];
    let combined = apply(&tariff(BillingPeriod::Monthly, charges.clone()), &s).unwrap();
    let separate: f64 = charges
        .into_iter()
        .map(|c| apply(&tariff(BillingPeriod::Monthly, vec![c]), &s).unwrap())
        .sum();
    assert!((combined - separate).abs() < 1e-9 * separate.abs().max(1.0));
}

#[test]
fn from_rows_matches_columnar_construction() {
    let ts = timestamps(at(2018, 3, 1, 0, 0), 60, 3);
    let rows = ts.iter().enumerate().map(|(i, t)| {
        let mut readings = BTreeMap::new();
        readings.insert(ENERGY.to_string(), i as f64);
        (*t, readings)
    });
    let from_rows = MeterSeries::from_rows(rows).unwrap();
    assert_eq!(from_rows, series(ts, ENERGY, vec![0.0, 1.0, 2.0]));
}
