// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line flags and their mapping onto `PipelineConfig`.

use std::path::PathBuf;

use clap::Parser;
use screenpress_core::PipelineConfig;
use screenpress_core::error::Result;

/// Capture script looked for next to the executable when `--script` is absent.
pub const DEFAULT_SCRIPT_NAME: &str = "auto_screenshot.applescript";

const AFTER_HELP: &str = r#"EXAMPLES:
  # Capture with the bundled AppleScript and bind the shots
  screenpress --output-pdf-path ~/Documents/MyReport.pdf

  # Smaller file: cap the width and drop colour
  screenpress --output-pdf-path report.pdf --max-width 1280 --grayscale

  # Bind screenshots that already exist (no capture)
  screenpress --output-pdf-path report.pdf --input-dir ~/Desktop/shots

CONFIG FILE (--config settings.json):
  {
    "normalization": { "max_width": 1600, "compression_level": 9, "grayscale": false },
    "dpi": 96.0,
    "title": "Weekly report"
  }
  Flags given on the command line take precedence over the file.

EXIT STATUS:
  0  the PDF was written
  1  capture, normalisation, or PDF assembly failed
  2  invalid command-line usage
"#;

/// Capture screenshots and bind them into a single PDF.
#[derive(Parser, Debug)]
#[command(
    name = "screenpress",
    version,
    about = "Capture screenshots and bind them into a single PDF",
    long_about = "Runs a capture script that saves screenshots into a temporary folder, \
normalises every image (width limit, optional grayscale, lossless PNG re-encode) and writes \
them as one page per image into a PDF. The temporary folder is removed afterwards.",
    after_long_help = AFTER_HELP
)]
pub struct Cli {
    /// Where to write the PDF (e.g. ~/Documents/MyReport.pdf).
    #[arg(long, env = "SCREENPRESS_OUTPUT")]
    pub output_pdf_path: PathBuf,

    /// Scale images wider than this down to this width. Zero or negative disables.
    #[arg(long, allow_negative_numbers = true)]
    pub max_width: Option<i64>,

    /// PNG compression effort, 0 (no compression) to 9 (smallest). Default 8.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Convert every image to grayscale.
    #[arg(long)]
    pub grayscale: bool,

    /// AppleScript that captures into the folder given as its argument.
    #[arg(long, env = "SCREENPRESS_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Bind the images in this folder instead of capturing new ones.
    #[arg(long, conflicts_with = "script")]
    pub input_dir: Option<PathBuf>,

    /// Pixels per inch used to size pages. Default 96.
    #[arg(long)]
    pub dpi: Option<f32>,

    /// PDF title. Default "Screenshots <date time>".
    #[arg(long)]
    pub title: Option<String>,

    /// JSON settings file; flags override its values.
    #[arg(long, env = "SCREENPRESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also overwrite each source image with its normalised PNG.
    #[arg(long)]
    pub write_back: bool,

    /// Re-open the written PDF and check its pages and checksum.
    #[arg(long)]
    pub verify: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Build the pipeline settings: config file (if any), then flags, then
    /// defaults for anything still unset.
    pub fn pipeline_config(&self, output_path: PathBuf) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        config.output_path = output_path;

        if let Some(max_width) = self.max_width {
            config.normalization.max_width = max_width;
        }
        if let Some(level) = self.compression_level {
            config.normalization.compression_level = level;
        }
        if self.grayscale {
            config.normalization.grayscale = true;
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if self.title.is_some() {
            config.title = self.title.clone();
        }
        if config.title.is_none() {
            config.title = Some(default_title());
        }
        if self.write_back {
            config.write_back = true;
        }

        config.validate()?;
        Ok(config)
    }

    /// The capture script to run: `--script`, else the default name next to
    /// the executable.
    pub fn script_path(&self) -> PathBuf {
        if let Some(script) = &self.script {
            return script.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_SCRIPT_NAME)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_NAME))
    }
}

fn default_title() -> String {
    format!("Screenshots {}", chrono::Local::now().format("%Y-%m-%d %H:%M"))
}
