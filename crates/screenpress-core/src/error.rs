// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Screenpress.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Screenpress operations.
///
/// Per-image normalisation failures are not represented here: they are
/// recovered locally and reported as `ImageWarning` values instead.
#[derive(Debug, Error)]
pub enum ScreenpressError {
    // -- Pipeline errors --
    #[error("image directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("no supported image files in {}", path.display())]
    NoImages { path: PathBuf },

    #[error("none of the {attempted} captured images could be used")]
    NoUsableImages { attempted: usize },

    #[error("no pages to assemble")]
    EmptyInput,

    #[error("PDF encoding failed: {0}")]
    EncodingError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF inspection failed: {0}")]
    PdfError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Capture collaborator --
    #[error("capture script not found: {}", path.display())]
    CaptureScriptMissing { path: PathBuf },

    #[error("capture exited with status {code:?}")]
    CaptureFailed { code: Option<i32> },

    #[error("screen capture is not available on this platform: {0}")]
    CaptureUnavailable(String),

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScreenpressError>;
