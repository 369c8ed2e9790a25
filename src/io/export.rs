//! CSV export for itemised bills.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::rating::Bill;

/// Column header for bill CSV export.
const HEADER: &str = "index,kind,label,channel,amount";

/// Exports a bill to a CSV file at the given path.
///
/// Writes a header row, one row per line item in tariff order, and a final
/// `total` row. Produces deterministic output for identical inputs.
///
/// # Arguments
///
/// * `bill` - Itemised bill to export
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(bill: &Bill, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(bill, buf)
}

/// Writes a bill as CSV to any writer.
///
/// # Arguments
///
/// * `bill` - Itemised bill to export
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(bill: &Bill, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for item in &bill.items {
        wtr.write_record(&[
            item.index.to_string(),
            item.kind.to_string(),
            item.label.clone(),
            item.channel.clone(),
            format!("{:.6}", item.amount),
        ])?;
    }

    // Summary row; index/kind/label/channel are left blank.
    wtr.write_record(&[
        String::new(),
        "total".to_string(),
        String::new(),
        String::new(),
        format!("{:.6}", bill.total()),
    ])?;

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::LineItem;
    use crate::tariff::ChargeKind;

    fn make_bill() -> Bill {
        Bill {
            items: vec![
                LineItem {
                    index: 0,
                    kind: ChargeKind::TimeOfUse,
                    label: "peak".to_string(),
                    channel: "imported energy (kwh)".to_string(),
                    amount: 12.5,
                    periods: Vec::new(),
                },
                LineItem {
                    index: 1,
                    kind: ChargeKind::Flat,
                    label: "flat".to_string(),
                    channel: "electricity_exported".to_string(),
                    amount: -2.25,
                    periods: Vec::new(),
                },
            ],
        }
    }

    fn render(bill: &Bill) -> String {
        let mut buf = Vec::new();
        write_csv(bill, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_and_rows() {
        let output = render(&make_bill());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], HEADER);
        // header + 2 items + total
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "0,time_of_use,peak,imported energy (kwh),12.500000");
        assert_eq!(lines[3], ",total,,,10.250000");
    }

    #[test]
    fn empty_bill_still_has_total() {
        let output = render(&Bill::default());
        assert_eq!(output.lines().last(), Some(",total,,,0.000000"));
    }

    #[test]
    fn deterministic_output() {
        let bill = make_bill();
        assert_eq!(render(&bill), render(&bill));
    }

    #[test]
    fn amounts_parse_back() {
        let output = render(&make_bill());
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let amounts: Vec<f64> = rdr
            .records()
            .filter_map(Result::ok)
            .filter_map(|rec| rec.get(4).and_then(|a| a.parse().ok()))
            .collect();
        assert_eq!(amounts, vec![12.5, -2.25, 10.25]);
    }
}
