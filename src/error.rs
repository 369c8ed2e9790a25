//! Error types for tariff construction, meter intake, and rating.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tariff::ChargeKind;

/// A single tariff validation problem with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffIssue {
    /// Dotted field path (e.g., `"charges[0].rate_bands[1].limit"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl TariffIssue {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for TariffIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failure to build a [`Tariff`](crate::tariff::Tariff) from settings or a document.
#[derive(Debug, Error)]
pub enum TariffError {
    #[error("malformed tariff: {}", join_issues(.0))]
    Malformed(Vec<TariffIssue>),

    #[error("cannot read tariff \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid tariff document: {0}")]
    Parse(String),
}

impl TariffError {
    /// Returns the validation issues, or an empty slice for I/O and parse failures.
    pub fn issues(&self) -> &[TariffIssue] {
        match self {
            Self::Malformed(issues) => issues,
            Self::Io { .. } | Self::Parse(_) => &[],
        }
    }
}

fn join_issues(issues: &[TariffIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure to build a [`MeterSeries`](crate::meter::MeterSeries).
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("timestamp at row {index} is earlier than the row before it")]
    Unordered { index: usize },

    #[error("channel \"{channel}\" has {found} readings but the series has {expected} timestamps")]
    LengthMismatch {
        channel: String,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: cannot parse timestamp \"{value}\"")]
    Timestamp { row: usize, value: String },

    #[error("row {row}: channel \"{channel}\" has non-numeric reading \"{value}\"")]
    Reading {
        row: usize,
        channel: String,
        value: String,
    },

    #[error("meter data has no timestamp column")]
    MissingTimestampColumn,

    #[error("channel \"{channel}\" appears more than once in the meter data header")]
    DuplicateChannel { channel: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("cannot read meter data \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure while applying a tariff to a meter series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("charge {index} ({kind}) requires channel \"{channel}\" which is absent from the meter series")]
    MissingChannel {
        index: usize,
        kind: ChargeKind,
        channel: String,
    },
}
