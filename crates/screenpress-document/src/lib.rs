// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// screenpress-document — Image normalisation and PDF assembly for Screenpress.
//
// Scans a capture directory into page order, normalises each screenshot
// (width limit, grayscale, alpha flattening, lossless re-encode), and binds
// the results into a single PDF with one image per page.

pub mod image;
pub mod integrity;
pub mod pdf;
pub mod pipeline;
pub mod scan;

// Re-export the primary structs so callers can use `screenpress_document::Pipeline` etc.
pub use self::image::{ImageNormalizer, ImageProcessor, Normalize, NormalizedAsset};
pub use pdf::{AssembledDocument, PageImage, PdfAssembler, PdfInspector};
pub use pipeline::{Pipeline, PipelineReport, ReportPage};
pub use scan::{CaptureSet, ImageAsset, scan_directory};
