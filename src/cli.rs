use std::env;
use std::path::PathBuf;

/// Port the API listens on when `--port` is not given.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug)]
pub struct CliOptions {
    pub tariff: PathBuf,
    /// Meter CSV to rate; may be omitted only when serving.
    pub meter: Option<PathBuf>,
    pub bill_out: Option<PathBuf>,
    pub serve: bool,
    pub port: u16,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut tariff = None;
    let mut meter = None;
    let mut bill_out = None;
    let mut serve = false;
    let mut port = None;

    while i < args.len() {
        match args[i].as_str() {
            "--tariff" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --tariff (expected a TOML or JSON file path)",
                )?;
                if tariff.replace(PathBuf::from(path)).is_some() {
                    return Err("--tariff provided more than once".to_string());
                }
            }
            "--meter" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --meter (expected a CSV file path)")?;
                if meter.replace(PathBuf::from(path)).is_some() {
                    return Err("--meter provided more than once".to_string());
                }
            }
            "--bill-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --bill-out (expected a file path)")?;
                if bill_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--bill-out provided more than once".to_string());
                }
            }
            "--serve" => {
                if !cfg!(feature = "api") {
                    return Err("--serve requires building with the `api` feature".to_string());
                }
                if serve {
                    return Err("--serve provided more than once".to_string());
                }
                serve = true;
            }
            "--port" => {
                if !cfg!(feature = "api") {
                    return Err("--port requires building with the `api` feature".to_string());
                }
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                let value = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
                if port.replace(value).is_some() {
                    return Err("--port provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    let tariff = tariff.ok_or_else(|| "missing required argument --tariff".to_string())?;
    if meter.is_none() && !serve {
        return Err("missing required argument --meter (or pass --serve)".to_string());
    }

    Ok(CliOptions {
        tariff,
        meter,
        bill_out,
        serve,
        port: port.unwrap_or(DEFAULT_PORT),
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  tariff-rater --tariff <path> --meter <csv> [--bill-out <path>]");
    if cfg!(feature = "api") {
        eprintln!("  tariff-rater --tariff <path> [--meter <csv>] --serve [--port <u16>]");
    }
    eprintln!();
    eprintln!("Log verbosity is controlled by RUST_LOG (default: tariff_rater=info).");
}
