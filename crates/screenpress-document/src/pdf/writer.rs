// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF assembler — bind an ordered run of screenshots into one PDF, one image
// per page, using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use printpdf::{
    ExternalXObject, ImageCompression, ImageOptimizationOptions, Mm, Op, PdfDocument, PdfPage,
    PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData, RawImageFormat, XObjectId,
    XObjectTransform,
};
use screenpress_core::PageOrigin;
use screenpress_core::config::DEFAULT_DPI;
use screenpress_core::error::{Result, ScreenpressError};
use tracing::{debug, info, instrument};

use crate::image::NormalizedAsset;
use crate::integrity::hash_bytes;
use crate::pdf::passthrough::embed_original;

const MM_PER_INCH: f32 = 25.4;

/// Encoded bytes destined for one page.
#[derive(Debug, Clone)]
pub struct PageImage {
    source: PathBuf,
    origin: PageOrigin,
    bytes: Vec<u8>,
}

impl PageImage {
    /// A page built from normaliser output.
    pub fn normalized(asset: NormalizedAsset) -> Self {
        let source = asset.source().to_path_buf();
        Self {
            source,
            origin: PageOrigin::Normalized,
            bytes: asset.into_bytes(),
        }
    }

    /// A page built from the untouched capture file.
    pub fn original(source: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            source: source.into(),
            origin: PageOrigin::Original,
            bytes,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn origin(&self) -> PageOrigin {
        self.origin
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A finished PDF, held entirely in memory until written.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    bytes: Vec<u8>,
    page_count: usize,
    sha256: String,
}

impl AssembledDocument {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Lowercase hex SHA-256 of [`AssembledDocument::bytes`].
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// Write the whole document to `path` in a single call, creating or
    /// truncating the file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), &self.bytes)?;
        info!(
            pages = self.page_count,
            bytes = self.bytes.len(),
            "Wrote PDF to {}",
            path.as_ref().display()
        );
        Ok(())
    }
}

/// Builds a PDF where page *i* is exactly image *i*.
///
/// Each page is sized to its image: pixel dimensions divided by the
/// configured density, so at the default 96 dpi a pixel is 0.75pt.
pub struct PdfAssembler {
    /// Pixels per inch used to size pages.
    dpi: f32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfAssembler {
    pub fn new(dpi: f32) -> Self {
        Self { dpi, title: None }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Page dimensions for an image of `width` x `height` pixels.
    fn page_dimensions(&self, width: usize, height: usize) -> (Mm, Mm) {
        let to_mm = |px: usize| Mm(px as f32 / self.dpi * MM_PER_INCH);
        (to_mm(width), to_mm(height))
    }

    /// Assemble `pages` in the order given.
    ///
    /// Original pages are embedded undecoded when their format allows it and
    /// decoded otherwise. Fails with `EmptyInput` for an empty slice and with
    /// `EncodingError` as soon as one page cannot be embedded either way.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn assemble(&self, pages: &[PageImage]) -> Result<AssembledDocument> {
        if pages.is_empty() {
            return Err(ScreenpressError::EmptyInput);
        }

        let title = self.title.as_deref().unwrap_or("Screenshots");
        let mut doc = PdfDocument::new(title);
        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len());

        for (index, page) in pages.iter().enumerate() {
            let embedded = Embedded::prepare(page).map_err(|reason| {
                ScreenpressError::EncodingError(format!(
                    "page {} ({}): {}",
                    index + 1,
                    page.source().display(),
                    reason
                ))
            })?;

            let (width, height) = embedded.size();
            let (page_w, page_h) = self.page_dimensions(width, height);
            debug!(
                page = index + 1,
                origin = ?page.origin(),
                width,
                height,
                undecoded = matches!(embedded, Embedded::Stream(_)),
                "Placing image"
            );

            let xobject_id = embedded.add_to(&mut doc);
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(self.dpi),
                    rotate: None,
                },
            }];
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&save_options(), &mut warnings);
        debug!(warnings = warnings.len(), "PDF serialised");

        let sha256 = hash_bytes(&bytes);
        info!(pages = pages.len(), bytes = bytes.len(), "PDF assembled");

        Ok(AssembledDocument {
            bytes,
            page_count: pages.len(),
            sha256,
        })
    }
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_DPI)
    }
}

/// Serialisation settings that keep every image at full resolution.
///
/// printpdf's defaults downsample and may JPEG-encode large rasters; here
/// pixels are only Flate-compressed.
fn save_options() -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: Some(ImageOptimizationOptions {
            quality: None,
            max_image_size: None,
            dither_greyscale: Some(false),
            convert_to_greyscale: Some(false),
            auto_optimize: Some(false),
            format: Some(ImageCompression::Flate),
        }),
        ..PdfSaveOptions::default()
    }
}

/// One page's image in the form it goes into the document.
enum Embedded {
    /// Decoded pixels.
    Raster(RawImage),
    /// The original file's compressed data.
    Stream(ExternalXObject),
}

impl Embedded {
    fn prepare(page: &PageImage) -> std::result::Result<Self, String> {
        if page.origin() == PageOrigin::Normalized {
            return raw_image(page.bytes()).map(Self::Raster);
        }
        match embed_original(page.bytes()) {
            Ok(xobject) => Ok(Self::Stream(xobject)),
            Err(undecoded) => raw_image(page.bytes())
                .map(Self::Raster)
                .map_err(|decoded| format!("{decoded}; {undecoded}")),
        }
    }

    fn size(&self) -> (usize, usize) {
        match self {
            Self::Raster(raw) => (raw.width, raw.height),
            Self::Stream(xobject) => (
                xobject.width.map_or(0, |px| px.0),
                xobject.height.map_or(0, |px| px.0),
            ),
        }
    }

    fn add_to(&self, doc: &mut PdfDocument) -> XObjectId {
        match self {
            Self::Raster(raw) => doc.add_image(raw),
            Self::Stream(xobject) => doc.add_xobject(xobject),
        }
    }
}

/// Decode one page's bytes into the raw raster printpdf embeds.
///
/// Only opaque gray and RGB data at 8 or 16 bits is accepted; anything else
/// should have been flattened by the normaliser.
fn raw_image(bytes: &[u8]) -> std::result::Result<RawImage, String> {
    let decoded = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let width = decoded.width() as usize;
    let height = decoded.height() as usize;

    let (pixels, data_format) = match decoded {
        DynamicImage::ImageLuma8(buf) => (RawImageData::U8(buf.into_raw()), RawImageFormat::R8),
        DynamicImage::ImageRgb8(buf) => (RawImageData::U8(buf.into_raw()), RawImageFormat::RGB8),
        DynamicImage::ImageLuma16(buf) => {
            (RawImageData::U16(buf.into_raw()), RawImageFormat::R16)
        }
        DynamicImage::ImageRgb16(buf) => {
            (RawImageData::U16(buf.into_raw()), RawImageFormat::RGB16)
        }
        other => {
            let color = other.color();
            let reason = if color.has_alpha() {
                format!("colour mode {color:?} carries an alpha channel")
            } else {
                format!("unsupported colour mode {color:?}")
            };
            return Err(reason);
        }
    };

    Ok(RawImage {
        pixels,
        width,
        height,
        data_format,
        tag: Vec::new(),
    })
}
