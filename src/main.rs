//! tariff-rater entry point: CLI wiring, loading, rating and output.

use std::process;

use tracing::info;

use tariff_rater::cli::{CliOptions, parse_args, print_usage};
use tariff_rater::io::export::export_csv;
use tariff_rater::meter::read_csv_path;
use tariff_rater::observability::init_tracing;
use tariff_rater::rating;
use tariff_rater::tariff::Tariff;

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn main() {
    let cli = parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        print_usage();
        process::exit(1);
    });
    init_tracing();

    let tariff = Tariff::from_path(&cli.tariff).unwrap_or_else(|e| fail(e));
    info!(
        path = %cli.tariff.display(),
        charges = tariff.charges().len(),
        billing_period = ?tariff.billing_period(),
        "tariff loaded"
    );

    if let Some(path) = &cli.meter {
        rate_meter(&tariff, path, &cli);
    }

    if cli.serve {
        serve(tariff, cli.port);
    }
}

fn rate_meter(tariff: &Tariff, path: &std::path::Path, cli: &CliOptions) {
    let series = read_csv_path(path).unwrap_or_else(|e| fail(e));
    info!(
        path = %path.display(),
        samples = series.len(),
        channels = series.channel_names().count(),
        "meter data loaded"
    );

    let bill = rating::bill(tariff, &series).unwrap_or_else(|e| fail(e));
    info!(total = bill.total(), "rating complete");
    println!("{bill}");

    if let Some(out) = &cli.bill_out {
        if let Err(e) = export_csv(&bill, out) {
            fail(format!("failed to write bill CSV: {e}"));
        }
        info!(path = %out.display(), "bill written");
    }
}

#[cfg(feature = "api")]
fn serve(tariff: Tariff, port: u16) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(tariff_rater::api::AppState { tariff });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new()
        .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
    if let Err(e) = rt.block_on(tariff_rater::api::serve(state, addr)) {
        fail(format!("API server on {addr}: {e}"));
    }
}

// `--serve` is rejected at parse time without the `api` feature.
#[cfg(not(feature = "api"))]
fn serve(_tariff: Tariff, _port: u16) {}
