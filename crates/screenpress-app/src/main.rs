// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Screenpress — capture a run of screenshots and bind them into a PDF.
//
// Entry point. Parses flags, initialises logging, runs one session, and maps
// the outcome to an exit status.

mod cli;
mod output;
mod session;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use screenpress_core::ScreenpressError;
use screenpress_core::human_errors::{Severity, humanize_error};
use screenpress_document::PipelineReport;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use session::ImageSource;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    tracing::info!("Screenpress starting");

    match run(&cli) {
        Ok(report) => match print_report(&report, cli.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            print_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<PipelineReport> {
    let output_path = output::prepare_output_path(&cli.output_pdf_path)
        .with_context(|| format!("preparing {}", cli.output_pdf_path.display()))?;
    let config = cli.pipeline_config(output_path)?;

    let source = match &cli.input_dir {
        Some(dir) => ImageSource::Directory(dir.clone()),
        None => ImageSource::Capture(screenpress_bridge::platform_capture(cli.script_path())),
    };

    Ok(session::run(config, source, cli.verify)?)
}

fn print_report(report: &PipelineReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Created PDF: {}", report.output_path.display());
    println!(
        "  pages: {} ({} from unmodified originals)",
        report.page_count(),
        report.fallback_count()
    );
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    println!("  size: {} bytes", report.bytes_written);
    println!("  sha256: {}", report.sha256);
    Ok(())
}

fn print_error(err: &anyhow::Error) {
    match err.downcast_ref::<ScreenpressError>() {
        Some(inner) => {
            let human = humanize_error(inner);
            eprintln!("{}: {}", error_label(human.severity), human.message);
            eprintln!("  {}", human.suggestion);
            eprintln!("  ({err:#})");
        }
        None => eprintln!("error: {err:#}"),
    }
}

/// Prefix telling the user whether retrying or changing something is the way out.
fn error_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Transient => "error (try again)",
        Severity::ActionRequired => "error (action needed)",
        Severity::Permanent => "error",
    }
}
