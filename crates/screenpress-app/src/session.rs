// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One capture session: get screenshots into a folder, run the pipeline, and
// optionally verify what was written.

use std::path::PathBuf;

use screenpress_bridge::ScreenCapture;
use screenpress_core::PipelineConfig;
use screenpress_core::error::{Result, ScreenpressError};
use screenpress_document::{PdfInspector, Pipeline, PipelineReport, integrity};
use tempfile::TempDir;
use tracing::{info, instrument, warn};

/// Prefix of the temporary capture folder.
pub const WORK_DIR_PREFIX: &str = "screenshots_workflow_";

/// Where the session's images come from.
pub enum ImageSource {
    /// Run a capture into a fresh temporary folder, removed afterwards.
    Capture(Box<dyn ScreenCapture>),
    /// Use the images already in this folder.
    Directory(PathBuf),
}

/// Run the whole session and return the pipeline report.
#[instrument(skip_all, fields(output = %config.output_path.display()))]
pub fn run(config: PipelineConfig, source: ImageSource, verify: bool) -> Result<PipelineReport> {
    let pipeline = Pipeline::new(config);

    let report = match source {
        ImageSource::Directory(dir) => pipeline.run(&dir)?,
        ImageSource::Capture(capture) => {
            let work_dir = tempfile::Builder::new()
                .prefix(WORK_DIR_PREFIX)
                .tempdir()?;
            info!(dir = %work_dir.path().display(), capture = capture.name(), "Created temporary capture folder");

            capture.capture_into(work_dir.path())?;
            let report = pipeline.run(work_dir.path())?;

            remove_work_dir(work_dir);
            report
        }
    };

    if verify {
        verify_written(&report)?;
    }
    Ok(report)
}

/// Delete the capture folder. The PDF is already written, so a failure here
/// is only logged. Returns whether the folder was removed.
fn remove_work_dir(work_dir: TempDir) -> bool {
    let path = work_dir.path().to_path_buf();
    match work_dir.close() {
        Ok(()) => {
            info!(dir = %path.display(), "Removed temporary capture folder");
            true
        }
        Err(err) => {
            warn!(dir = %path.display(), error = %err, "Could not remove temporary capture folder");
            false
        }
    }
}

/// Re-open the written PDF and compare it against the report.
fn verify_written(report: &PipelineReport) -> Result<()> {
    integrity::verify_file(&report.output_path, &report.sha256)?;
    let pages = PdfInspector::open(&report.output_path)?.page_count();
    if pages != report.page_count() {
        return Err(ScreenpressError::PdfError(format!(
            "{} has {pages} pages, expected {}",
            report.output_path.display(),
            report.page_count()
        )));
    }
    info!(pages, "Verified written PDF");
    Ok(())
}
