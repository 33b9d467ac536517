// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspector — reopen an assembled PDF with `lopdf` to confirm what was
// written: page count, per-page media box and the pixel size of each page's
// image.

use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use screenpress_core::error::ScreenpressError;
use tracing::{debug, instrument};

/// Read-only view of an existing PDF.
pub struct PdfInspector {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfInspector {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ScreenpressError> {
        let path_ref = path.as_ref();
        let document = Document::load(path_ref).map_err(|err| {
            ScreenpressError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Inspect raw PDF bytes already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ScreenpressError> {
        let document = Document::load_mem(data).map_err(|err| {
            ScreenpressError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height of every page in points, in page order.
    pub fn page_sizes_pt(&self) -> Result<Vec<(f32, f32)>, ScreenpressError> {
        // lopdf pages are keyed by 1-indexed page number, already sorted.
        self.document
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| {
                let media_box = self.media_box(page_id).ok_or_else(|| {
                    ScreenpressError::PdfError(format!("page {number} has no usable MediaBox"))
                })?;
                Ok((media_box[2] - media_box[0], media_box[3] - media_box[1]))
            })
            .collect()
    }

    /// Pixel width and height of the first image drawn on each page, in page
    /// order, as stored in the image XObject.
    pub fn image_sizes_px(&self) -> Result<Vec<(i64, i64)>, ScreenpressError> {
        self.document
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| {
                self.page_image_size(page_id).ok_or_else(|| {
                    ScreenpressError::PdfError(format!("page {number} draws no readable image"))
                })
            })
            .collect()
    }

    fn page_image_size(&self, page_id: ObjectId) -> Option<(i64, i64)> {
        let content = Content::decode(&self.document.get_page_content(page_id).ok()?).ok()?;
        let drawn = content
            .operations
            .iter()
            .find(|op| op.operator == "Do")?
            .operands
            .first()?
            .as_name()
            .ok()?;

        let page = self.document.get_dictionary(page_id).ok()?;
        let resources = self.resolve_dict(page.get(b"Resources").ok()?)?;
        let xobjects = self.resolve_dict(resources.get(b"XObject").ok()?)?;
        let (_, image) = self.document.dereference(xobjects.get(drawn).ok()?).ok()?;
        let dict = &image.as_stream().ok()?.dict;
        Some((
            dict.get(b"Width").ok()?.as_i64().ok()?,
            dict.get(b"Height").ok()?.as_i64().ok()?,
        ))
    }

    fn resolve_dict<'a>(&'a self, object: &'a Object) -> Option<&'a Dictionary> {
        let (_, object) = self.document.dereference(object).ok()?;
        object.as_dict().ok()
    }

    /// The page's MediaBox, following `/Parent` links for inherited values.
    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        let mut dict: &Dictionary = self.document.get_dictionary(page_id).ok()?;
        loop {
            if let Ok(object) = dict.get(b"MediaBox") {
                return self.read_rect(object);
            }
            let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
            dict = self.document.get_dictionary(parent).ok()?;
        }
    }

    fn read_rect(&self, object: &Object) -> Option<[f32; 4]> {
        let (_, object) = self.document.dereference(object).ok()?;
        let values = object.as_array().ok()?;
        if values.len() != 4 {
            return None;
        }
        let mut rect = [0.0f32; 4];
        for (slot, value) in rect.iter_mut().zip(values) {
            *slot = value.as_float().ok()?;
        }
        Some(rect)
    }
}
