// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture-to-PDF pipeline.
//
// Scan → normalise each image → assemble → write. The only recovery anywhere
// is per image: an image that cannot be normalised is replaced by its original
// bytes. Everything else fails fast and nothing is retried.

use std::path::{Path, PathBuf};

use screenpress_core::error::{Result, ScreenpressError};
use screenpress_core::{ImageWarning, PageOrigin, PipelineConfig};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::image::{ImageNormalizer, Normalize};
use crate::pdf::{PageImage, PdfAssembler};
use crate::scan::{CaptureSet, ImageAsset, scan_directory};

/// Where one page of the output came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPage {
    pub source: PathBuf,
    pub origin: PageOrigin,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub output_path: PathBuf,
    /// Pages in output order.
    pub pages: Vec<ReportPage>,
    /// Non-fatal problems, in capture order.
    pub warnings: Vec<ImageWarning>,
    pub bytes_written: usize,
    pub sha256: String,
}

impl PipelineReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages that fell back to the untouched capture file.
    pub fn fallback_count(&self) -> usize {
        self.pages
            .iter()
            .filter(|page| page.origin == PageOrigin::Original)
            .count()
    }
}

/// Drives one capture directory through to a PDF.
pub struct Pipeline<N = ImageNormalizer> {
    config: PipelineConfig,
    normalizer: N,
}

impl Pipeline<ImageNormalizer> {
    /// A pipeline using the standard normaliser configured from `config`.
    pub fn new(config: PipelineConfig) -> Self {
        let normalizer =
            ImageNormalizer::new(config.normalization).with_write_back(config.write_back);
        Self { config, normalizer }
    }
}

impl<N: Normalize> Pipeline<N> {
    /// A pipeline with a caller-supplied normalisation step.
    pub fn with_normalizer(config: PipelineConfig, normalizer: N) -> Self {
        Self { config, normalizer }
    }

    /// Turn the images in `image_dir` into the configured output PDF.
    ///
    /// The output file is only touched once the whole document has been
    /// assembled, so every error path leaves it as it was.
    #[instrument(skip_all, fields(dir = %image_dir.as_ref().display(), output = %self.config.output_path.display()))]
    pub fn run(&self, image_dir: impl AsRef<Path>) -> Result<PipelineReport> {
        let image_dir = image_dir.as_ref();

        let capture = scan_directory(image_dir)?;
        if capture.is_empty() {
            return Err(ScreenpressError::NoImages {
                path: image_dir.to_path_buf(),
            });
        }

        let (pages, warnings) = self.normalize_each(&capture);
        if pages.is_empty() {
            return Err(ScreenpressError::NoUsableImages {
                attempted: capture.len(),
            });
        }

        let mut assembler = PdfAssembler::new(self.config.dpi);
        if let Some(title) = &self.config.title {
            assembler.set_title(title.clone());
        }
        let document = assembler.assemble(&pages)?;
        document.write_to(&self.config.output_path)?;

        let report = PipelineReport {
            output_path: self.config.output_path.clone(),
            pages: pages
                .iter()
                .map(|page| ReportPage {
                    source: page.source().to_path_buf(),
                    origin: page.origin(),
                })
                .collect(),
            warnings,
            bytes_written: document.bytes().len(),
            sha256: document.sha256().to_owned(),
        };

        info!(
            pages = report.page_count(),
            fallbacks = report.fallback_count(),
            warnings = report.warnings.len(),
            "Pipeline complete"
        );
        Ok(report)
    }

    /// Normalise every image in capture order, substituting originals for
    /// failures and dropping originals that are unusable too.
    fn normalize_each(&self, capture: &CaptureSet) -> (Vec<PageImage>, Vec<ImageWarning>) {
        let mut pages = Vec::with_capacity(capture.len());
        let mut warnings = Vec::new();

        for (index, asset) in capture.iter().enumerate() {
            let warning = match self.normalizer.normalize(index, asset) {
                Ok(normalized) => {
                    pages.push(PageImage::normalized(normalized));
                    continue;
                }
                Err(warning) => warning,
            };

            warn!(%warning, "Normalisation failed; using the original file");
            warnings.push(warning);

            match usable_original(asset) {
                Ok(bytes) => pages.push(PageImage::original(asset.path(), bytes)),
                Err(reason) => {
                    let dropped = ImageWarning::new(
                        index,
                        asset.path(),
                        format!("original unusable, page left out: {reason}"),
                    );
                    warn!(warning = %dropped, "Skipping image");
                    warnings.push(dropped);
                }
            }
        }

        (pages, warnings)
    }
}

/// Read a capture file for use as-is: it must be non-empty and start with a
/// recognisable image signature.
fn usable_original(asset: &ImageAsset) -> std::result::Result<Vec<u8>, String> {
    let bytes = asset.read_original().map_err(|err| err.to_string())?;
    if bytes.is_empty() {
        return Err("file is empty".into());
    }
    image::guess_format(&bytes).map_err(|_| "no recognisable image signature".to_string())?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_original_is_unusable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"").unwrap();
        let asset = ImageAsset::from_path(&path).unwrap();
        assert_eq!(usable_original(&asset).unwrap_err(), "file is empty");
    }

    #[test]
    fn unsigned_original_is_unusable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, b"hello world").unwrap();
        let asset = ImageAsset::from_path(&path).unwrap();
        assert!(usable_original(&asset).is_err());
    }

    #[test]
    fn signed_original_is_usable_even_if_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        let bytes = b"\x89PNG\r\n\x1a\n\0\0".to_vec();
        std::fs::write(&path, &bytes).unwrap();
        let asset = ImageAsset::from_path(&path).unwrap();
        assert_eq!(usable_original(&asset).unwrap(), bytes);
    }
}
