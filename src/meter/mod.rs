//! Meter data: the time series a tariff is rated against.

/// CSV intake.
pub mod reader;
pub mod series;

pub use reader::{read_csv, read_csv_path};
pub use series::MeterSeries;
pub(crate) use series::present_sum;
