// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScreenpressError};

/// Default PNG effort when none is given.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 8;

/// Pixels per inch used to size pages when the capture carries no density.
pub const DEFAULT_DPI: f32 = 96.0;

/// Per-image normalisation settings, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Maximum page width in pixels. Zero or negative disables resizing.
    pub max_width: i64,
    /// Lossless re-encode effort, 0 (stored uncompressed) through 9 (smallest).
    pub compression_level: u8,
    /// Convert every page to single-channel luminance.
    pub grayscale: bool,
}

impl NormalizationConfig {
    /// The width limit, or `None` when resizing is disabled.
    pub fn width_limit(&self) -> Option<u32> {
        if self.max_width <= 0 {
            return None;
        }
        Some(u32::try_from(self.max_width).unwrap_or(u32::MAX))
    }
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            max_width: 0,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            grayscale: false,
        }
    }
}

/// Everything the pipeline needs for one capture session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Destination of the assembled PDF. Created or overwritten.
    pub output_path: PathBuf,
    pub normalization: NormalizationConfig,
    /// Density used to turn pixel dimensions into page dimensions.
    pub dpi: f32,
    /// Title stored in the PDF metadata.
    pub title: Option<String>,
    /// Also write normalised PNG bytes back over the source files.
    pub write_back: bool,
}

impl PipelineConfig {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Range-check the values a caller may have supplied by hand.
    pub fn validate(&self) -> Result<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(ScreenpressError::InvalidConfig(
                "output path must not be empty".into(),
            ));
        }
        if self.normalization.compression_level > 9 {
            return Err(ScreenpressError::InvalidConfig(format!(
                "compression level must be 0-9, got {}",
                self.normalization.compression_level
            )));
        }
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(ScreenpressError::InvalidConfig(format!(
                "dpi must be a positive number, got {}",
                self.dpi
            )));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::new(),
            normalization: NormalizationConfig::default(),
            dpi: DEFAULT_DPI,
            title: None,
            write_back: false,
        }
    }
}
