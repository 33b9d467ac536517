// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Screenpress capture pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Image file types accepted from a capture directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageKind {
    Png,
    Jpeg,
    Bmp,
    Gif,
    Tiff,
}

impl ImageKind {
    /// Infer the image kind from a file extension (case-insensitive).
    ///
    /// Only the extensions a capture session produces are recognised; `.tif`
    /// and anything else yield `None`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }
}

/// Which bytes ended up on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageOrigin {
    /// Output of the normaliser.
    Normalized,
    /// The capture file as found on disk, after normalisation failed.
    Original,
}

/// A non-fatal, per-image problem.
///
/// Raised when an image cannot be normalised (the original is used instead)
/// or when even the original is unusable (the image is left out).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageWarning {
    /// Position of the image in the capture set.
    pub index: usize,
    pub path: PathBuf,
    pub reason: String,
}

impl ImageWarning {
    pub fn new(index: usize, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            index,
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for ImageWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "image #{} ({}): {}",
            self.index + 1,
            self.path.display(),
            self.reason
        )
    }
}
