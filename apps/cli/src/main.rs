// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: inspect and normalise SinusX curve files
//!
//! Usage:
//!   sinusx info <file.sx> [--json] [--no-shift]
//!   sinusx convert <input.sx> <output.sx> [--no-shift]
//!
//! Logging goes to stderr and follows `RUST_LOG`; see [`config::Config`]
//! for the other environment variables.

use std::env;
use std::path::Path;

use anyhow::Result;
use sinusx_core::{load_file, save_file, FileStatus, LoadParameters, LoadReport, ShiftMode, Status};
use tracing_subscriber::EnvFilter;

mod config;
mod error;

use config::{Config, LogFormat};
use error::CliError;

fn main() {
    let config = Config::from_env();
    init_logging(&config);

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        return;
    }

    if let Err(err) = run(&config, &args) {
        eprintln!("error: {:#}", err);
        let code = err
            .downcast_ref::<CliError>()
            .map(CliError::exit_code)
            .unwrap_or(1);
        if code == 2 {
            print_usage();
        }
        std::process::exit(code);
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  sinusx info <file.sx> [--json] [--no-shift]");
    eprintln!("  sinusx convert <input.sx> <output.sx> [--no-shift]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SINUSX_SHIFT=auto|off        recenter large coordinates (default: auto)");
    eprintln!("  SINUSX_SHIFT_THRESHOLD=<f64> recentering threshold (default: 10000)");
    eprintln!("  SINUSX_LOG_FORMAT=pretty|compact|json");
}

/// Parsed command-line options shared by all commands
#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    json: bool,
    no_shift: bool,
}

fn parse_options(args: &[String]) -> Result<Options, CliError> {
    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "--json" => options.json = true,
            "--no-shift" => options.no_shift = true,
            other if other.starts_with("--") => {
                return Err(CliError::UnknownOption(other.to_string()))
            }
            other => options.positional.push(other.to_string()),
        }
    }
    Ok(options)
}

fn run(config: &Config, args: &[String]) -> Result<()> {
    let command = args[0].as_str();
    let options = parse_options(&args[1..])?;

    let mut params = config.load_parameters();
    if options.no_shift {
        params.shift = ShiftMode::Disabled;
    }

    match command {
        "info" => {
            let input = options
                .positional
                .first()
                .ok_or(CliError::MissingArgument("<file.sx>"))?;
            let report = load(input, &params)?;
            if options.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_summary(input, &report);
            }
        }
        "convert" => {
            let input = options
                .positional
                .first()
                .ok_or(CliError::MissingArgument("<input.sx>"))?;
            let output = options
                .positional
                .get(1)
                .ok_or(CliError::MissingArgument("<output.sx>"))?;

            let report = load(input, &params)?;
            if report.status() == Status::NothingToLoad {
                return Err(CliError::Unusable {
                    path: input.clone(),
                    status: FileStatus::NothingToLoad,
                }
                .into());
            }

            let saved = save_file(output, &report.polylines).map_err(|source| CliError::Codec {
                path: output.clone(),
                source,
            })?;
            if saved.status() == Status::NothingToSave {
                return Err(CliError::Unusable {
                    path: output.clone(),
                    status: FileStatus::NothingToSave,
                }
                .into());
            }
            tracing::info!(
                input = %input,
                output = %output,
                curves = saved.written,
                rejected_lines = report.diagnostics.len(),
                "Converted"
            );
        }
        other => return Err(CliError::UnknownCommand(other.to_string()).into()),
    }
    Ok(())
}

fn load(path: &str, params: &LoadParameters) -> Result<LoadReport, CliError> {
    load_file(Path::new(path), params).map_err(|source| CliError::Codec {
        path: path.to_string(),
        source,
    })
}

fn print_summary(path: &str, report: &LoadReport) {
    println!("{}: {:?}", path, FileStatus::from(report.status()));
    println!(
        "  {} curve(s), {} vertices, {} line(s)",
        report.polylines.len(),
        report.vertex_count(),
        report.lines_read
    );
    if let Some(shift) = &report.shift {
        println!(
            "  global shift: ({:.2}, {:.2}, {:.2})",
            shift.x, shift.y, shift.z
        );
    }

    for poly in &report.polylines {
        let mut flags = Vec::new();
        if poly.closed {
            flags.push("closed".to_string());
        }
        if !poly.visible {
            flags.push("points only".to_string());
        }
        if let Some(z) = poly.const_altitude {
            flags.push(format!("altitude {}", z));
        }
        println!(
            "  [{}] {:<24} {:>8} vertices  up={:?} {}",
            poly.curve_type.tag(),
            poly.name,
            poly.len(),
            poly.up_axis,
            flags.join(", ")
        );
    }

    for diagnostic in &report.diagnostics {
        println!("  {:?}: {}", diagnostic.severity, diagnostic);
    }
}
