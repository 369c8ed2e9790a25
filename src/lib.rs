//! Tariff rating engine for metered energy-usage time series.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod error;
/// Bill export.
pub mod io;
pub mod meter;
pub mod observability;
/// Applying tariffs to meter data.
pub mod rating;
pub mod tariff;
pub mod timestamp;

pub use error::{RatingError, SeriesError, TariffError, TariffIssue};
pub use meter::MeterSeries;
pub use rating::{Bill, apply, bill};
pub use tariff::Tariff;
