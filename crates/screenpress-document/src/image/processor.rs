// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — width limiting, grayscale, alpha flattening, and lossless
// PNG encoding. Operates on in-memory images using the `image` crate.

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, ImageReader, Luma, LumaA, Pixel, Primitive, Rgb, Rgba};
use screenpress_core::error::ScreenpressError;
use tracing::{debug, info, instrument};

/// Image processing steps operating on a single in-memory image.
///
/// Each transform consumes `self` and returns a new `ImageProcessor`, so the
/// normalisation order reads top to bottom:
///
/// ```ignore
/// let png = ImageProcessor::open("shot_001.png")?
///     .fit_width(1280)
///     .grayscale()
///     .flatten_alpha()
///     .to_png_bytes(8)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    ///
    /// The format is sniffed from the file contents, so a capture saved with
    /// a misleading extension still decodes.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, ScreenpressError> {
        let img = ImageReader::open(path.as_ref())?
            .with_guessed_format()?
            .decode()
            .map_err(|err| {
                ScreenpressError::ImageError(format!(
                    "failed to open {}: {}",
                    path.as_ref().display(),
                    err
                ))
            })?;
        debug!(
            width = img.width(),
            height = img.height(),
            color = ?img.color(),
            "Image loaded"
        );
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (PNG, JPEG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ScreenpressError> {
        let img = image::load_from_memory(data).map_err(|err| {
            ScreenpressError::ImageError(format!("failed to decode image: {}", err))
        })?;
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the current colour mode carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Shrink the image so it is at most `max_width` pixels wide.
    ///
    /// Both axes are scaled by `max_width / width`; the new height is truncated
    /// (never below one pixel). Images already narrow enough are returned
    /// untouched. Uses Lanczos3 filtering.
    #[instrument(skip(self))]
    pub fn fit_width(self, max_width: u32) -> Self {
        let (width, height) = (self.image.width(), self.image.height());
        if max_width == 0 || width <= max_width {
            return self;
        }

        let new_height = scaled_height(width, height, max_width);
        info!(
            from_w = width,
            from_h = height,
            to_w = max_width,
            to_h = new_height,
            "Resizing image"
        );
        let resized = self
            .image
            .resize_exact(max_width, new_height, FilterType::Lanczos3);
        Self { image: resized }
    }

    /// Convert the image to luminance.
    ///
    /// An alpha channel, if present, is kept alongside the luminance so that
    /// [`ImageProcessor::flatten_alpha`] can still composite it.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        debug!(color = ?self.image.color(), "Converting to grayscale");
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Composite any alpha channel onto opaque white and drop it.
    ///
    /// RGBA becomes RGB and luminance+alpha becomes luminance, at the same bit
    /// depth. Floating-point images are reduced to 16-bit, since neither PNG
    /// nor the PDF writer stores float samples. Other opaque images pass
    /// through unchanged.
    #[instrument(skip(self))]
    pub fn flatten_alpha(self) -> Self {
        let image = match self.image {
            DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgb8(flatten_rgba(&buf)),
            DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLuma8(flatten_luma_alpha(&buf)),
            DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgb16(flatten_rgba(&buf)),
            DynamicImage::ImageLumaA16(buf) => {
                DynamicImage::ImageLuma16(flatten_luma_alpha(&buf))
            }
            DynamicImage::ImageRgba32F(buf) => {
                let wide = DynamicImage::ImageRgba32F(buf).to_rgba16();
                DynamicImage::ImageRgb16(flatten_rgba(&wide))
            }
            DynamicImage::ImageRgb32F(buf) => {
                DynamicImage::ImageRgb16(DynamicImage::ImageRgb32F(buf).to_rgb16())
            }
            opaque => return Self { image: opaque },
        };
        debug!(color = ?image.color(), "Alpha flattened onto white");
        Self { image }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG.
    ///
    /// `compression_level` follows the zlib scale: 0 stores the data
    /// uncompressed, 9 spends the most effort.
    pub fn to_png_bytes(&self, compression_level: u8) -> Result<Vec<u8>, ScreenpressError> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            &mut buffer,
            png_compression(compression_level),
            PngFilter::Adaptive,
        );
        self.image.write_with_encoder(encoder).map_err(|err| {
            ScreenpressError::ImageError(format!("PNG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }
}

/// Height after scaling `width` down to `max_width`, truncated, at least 1.
pub(crate) fn scaled_height(width: u32, height: u32, max_width: u32) -> u32 {
    // max_width < width, so the result is below `height` and fits in u32.
    let scaled = u64::from(height) * u64::from(max_width) / u64::from(width);
    (scaled as u32).max(1)
}

fn png_compression(level: u8) -> CompressionType {
    match level {
        0 => CompressionType::Uncompressed,
        level => CompressionType::Level(level.min(9)),
    }
}

// -- Alpha compositing --------------------------------------------------------

/// Blend one sample over a white background: `c·a + max·(max − a)`, rounded.
fn over_white<T>(channel: T, alpha: T) -> T
where
    T: Primitive + Into<u64> + TryFrom<u64>,
{
    let max: u64 = T::DEFAULT_MAX_VALUE.into();
    let (c, a) = (channel.into(), alpha.into());
    let blended = (c * a + max * (max - a) + max / 2) / max;
    T::try_from(blended).unwrap_or(T::DEFAULT_MAX_VALUE)
}

fn flatten_rgba<T>(buf: &ImageBuffer<Rgba<T>, Vec<T>>) -> ImageBuffer<Rgb<T>, Vec<T>>
where
    T: Primitive + Into<u64> + TryFrom<u64>,
    Rgba<T>: Pixel<Subpixel = T>,
    Rgb<T>: Pixel<Subpixel = T>,
{
    ImageBuffer::from_fn(buf.width(), buf.height(), |x, y| {
        let Rgba([r, g, b, a]) = *buf.get_pixel(x, y);
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

fn flatten_luma_alpha<T>(buf: &ImageBuffer<LumaA<T>, Vec<T>>) -> ImageBuffer<Luma<T>, Vec<T>>
where
    T: Primitive + Into<u64> + TryFrom<u64>,
    LumaA<T>: Pixel<Subpixel = T>,
    Luma<T>: Pixel<Subpixel = T>,
{
    ImageBuffer::from_fn(buf.width(), buf.height(), |x, y| {
        let LumaA([l, a]) = *buf.get_pixel(x, y);
        Luma([over_white(l, a)])
    })
}
