// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-image normalisation — resize, grayscale, flatten alpha, re-encode as PNG.
// The result is handed to the PDF assembler in memory.

use std::path::{Path, PathBuf};

use screenpress_core::error::Result;
use screenpress_core::{ImageWarning, NormalizationConfig};
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;
use crate::scan::ImageAsset;

/// One screenshot after normalisation: opaque, losslessly encoded, owned.
#[derive(Debug, Clone)]
pub struct NormalizedAsset {
    source: PathBuf,
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl NormalizedAsset {
    pub fn new(source: impl Into<PathBuf>, width: u32, height: u32, png: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            width,
            height,
            png,
        }
    }

    /// Path of the capture file this asset came from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded PNG bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.png
    }
}

/// A normalisation step for one image.
///
/// Failure is reported as an [`ImageWarning`] rather than an error: the caller
/// is expected to fall back to the original file and carry on.
pub trait Normalize {
    fn normalize(&self, index: usize, asset: &ImageAsset)
    -> std::result::Result<NormalizedAsset, ImageWarning>;
}

/// The standard normaliser, driven by a [`NormalizationConfig`].
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    config: NormalizationConfig,
    /// Also overwrite the source file with the PNG bytes.
    write_back: bool,
}

impl ImageNormalizer {
    pub fn new(config: NormalizationConfig) -> Self {
        Self {
            config,
            write_back: false,
        }
    }

    /// Persist each normalised image over its source file.
    ///
    /// The path (and so the extension) is kept; only the bytes change.
    pub fn with_write_back(mut self, write_back: bool) -> Self {
        self.write_back = write_back;
        self
    }

    fn process(&self, asset: &ImageAsset) -> Result<NormalizedAsset> {
        let mut processor = ImageProcessor::open(asset.path())?;

        if let Some(limit) = self.config.width_limit() {
            processor = processor.fit_width(limit);
        }
        if self.config.grayscale {
            processor = processor.grayscale();
        }
        let processor = processor.flatten_alpha();

        let png = processor.to_png_bytes(self.config.compression_level)?;
        if self.write_back {
            std::fs::write(asset.path(), &png)?;
        }

        Ok(NormalizedAsset::new(
            asset.path(),
            processor.width(),
            processor.height(),
            png,
        ))
    }
}

impl Normalize for ImageNormalizer {
    #[instrument(skip_all, fields(index = index, file = %asset.file_name()))]
    fn normalize(
        &self,
        index: usize,
        asset: &ImageAsset,
    ) -> std::result::Result<NormalizedAsset, ImageWarning> {
        let normalized = self
            .process(asset)
            .map_err(|err| ImageWarning::new(index, asset.path(), err.to_string()))?;
        debug!(
            width = normalized.width(),
            height = normalized.height(),
            bytes = normalized.bytes().len(),
            "Image normalised"
        );
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

    fn save(dir: &Path, name: &str, image: DynamicImage) -> ImageAsset {
        let path = dir.join(name);
        image.save(&path).unwrap();
        ImageAsset::from_path(path).unwrap()
    }

    fn decode(asset: &NormalizedAsset) -> DynamicImage {
        image::load_from_memory(asset.bytes()).unwrap()
    }

    #[test]
    fn default_config_is_a_pixel_no_op_for_opaque_images() {
        let dir = tempfile::tempdir().unwrap();
        let original = DynamicImage::ImageRgb8(RgbImage::from_fn(40, 30, |x, y| {
            Rgb([x as u8, y as u8, (x + y) as u8])
        }));
        let asset = save(dir.path(), "a.png", original.clone());

        let normalizer = ImageNormalizer::new(NormalizationConfig::default());
        let first = normalizer.normalize(0, &asset).unwrap();
        assert_eq!(decode(&first), original);

        // Running it again over its own output changes nothing either.
        std::fs::write(asset.path(), first.bytes()).unwrap();
        let second = normalizer.normalize(0, &asset).unwrap();
        assert_eq!(decode(&second), original);
    }

    #[test]
    fn applies_resize_grayscale_and_flatten_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let asset = save(
            dir.path(),
            "wide.png",
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(400, 250, Rgba([10, 200, 30, 0]))),
        );
        let config = NormalizationConfig {
            max_width: 100,
            compression_level: 9,
            grayscale: true,
        };

        let out = ImageNormalizer::new(config).normalize(3, &asset).unwrap();
        assert_eq!((out.width(), out.height()), (100, 62));

        let decoded = decode(&out);
        assert_eq!(decoded.color(), ColorType::L8);
        assert_eq!(decoded.to_luma8().get_pixel(50, 30).0, [255]);
    }

    #[test]
    fn negative_max_width_keeps_size() {
        let dir = tempfile::tempdir().unwrap();
        let asset = save(
            dir.path(),
            "a.png",
            DynamicImage::ImageRgb8(RgbImage::new(64, 48)),
        );
        let config = NormalizationConfig {
            max_width: -1,
            ..Default::default()
        };
        let out = ImageNormalizer::new(config).normalize(0, &asset).unwrap();
        assert_eq!((out.width(), out.height()), (64, 48));
    }

    #[test]
    fn corrupt_file_becomes_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").unwrap();
        let asset = ImageAsset::from_path(&path).unwrap();

        let warning = ImageNormalizer::new(NormalizationConfig::default())
            .normalize(2, &asset)
            .unwrap_err();
        assert_eq!(warning.index, 2);
        assert_eq!(warning.path, path);
        // The original must be left exactly as it was.
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG\r\n\x1a\nnot really");
    }

    #[test]
    fn write_back_replaces_bytes_but_keeps_path() {
        let dir = tempfile::tempdir().unwrap();
        let asset = save(
            dir.path(),
            "shot.bmp",
            DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([9, 9, 9]))),
        );

        let out = ImageNormalizer::new(NormalizationConfig::default())
            .with_write_back(true)
            .normalize(0, &asset)
            .unwrap();

        assert!(asset.path().ends_with("shot.bmp"));
        assert_eq!(std::fs::read(asset.path()).unwrap(), out.bytes());
        assert_eq!(image::guess_format(out.bytes()).unwrap(), image::ImageFormat::Png);
    }
}
