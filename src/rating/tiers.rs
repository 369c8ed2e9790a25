//! Tiered rate-band arithmetic shared by consumption and banded demand charges.

use crate::tariff::RateBand;

/// Splits `usage` across `bands`, returning the quantity consumed in each.
///
/// Bands are walked in order with a running `prior` limit starting at zero.
/// A limited band takes `clamp(usage - prior, 0, limit - prior)`; the final
/// unbounded band takes whatever remains. Non-positive usage yields zeros.
///
/// # Examples
///
/// ```
/// use tariff_rater::rating::tiers::split;
/// use tariff_rater::tariff::RateBand;
///
/// let bands = [RateBand::limited(10.0, 0.10), RateBand::limited(400.0, 0.15), RateBand::unbounded(0.30)];
/// assert_eq!(split(&bands, 500.0), vec![10.0, 390.0, 100.0]);
/// ```
pub fn split(bands: &[RateBand], usage: f64) -> Vec<f64> {
    let mut prior = 0.0_f64;
    bands
        .iter()
        .map(|band| match band.limit {
            Some(limit) => {
                let width = (limit - prior).max(0.0);
                let consumed = (usage - prior).clamp(0.0, width);
                prior = limit;
                consumed
            }
            None => (usage - prior).max(0.0),
        })
        .collect()
}

/// Prices `usage` across `bands`.
pub fn amount(bands: &[RateBand], usage: f64) -> f64 {
    split(bands, usage)
        .iter()
        .zip(bands)
        .map(|(consumed, band)| consumed * band.rate)
        .sum()
}
