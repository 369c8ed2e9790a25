//! Itemised rating result.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::tariff::ChargeKind;

/// Quantity and amount accrued in one billing period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAmount {
    pub start: NaiveDateTime,
    /// Exclusive end of the period.
    pub end: NaiveDateTime,
    /// Summed usage for consumption charges, peak demand for demand charges.
    pub quantity: f64,
    pub amount: f64,
}

/// The amount one charge contributed to a bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    /// Position of the charge in the tariff.
    pub index: usize,
    pub kind: ChargeKind,
    pub label: String,
    /// Meter channel the charge was rated on.
    pub channel: String,
    pub amount: f64,
    /// Per-period breakdown; only tiered consumption and demand charges fill this.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<PeriodAmount>,
}

/// Line items in tariff order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bill {
    pub items: Vec<LineItem>,
}

impl Bill {
    /// Sums the line items in charge order.
    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.amount).sum()
    }
}

impl fmt::Display for Bill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Bill ---")?;
        for item in &self.items {
            writeln!(
                f,
                "{:>2}. {:<12} {:<16} {:<28} {:>14.4}",
                item.index,
                item.kind.as_str(),
                item.label,
                item.channel,
                item.amount
            )?;
            for period in &item.periods {
                writeln!(
                    f,
                    "      {} .. {}  qty={:.4}  amount={:.4}",
                    period.start, period.end, period.quantity, period.amount
                )?;
            }
        }
        write!(f, "Total: {:.4}", self.total())
    }
}
