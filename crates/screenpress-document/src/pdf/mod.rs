// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — assembling screenshots into pages, and reading the result back.

mod passthrough;
pub mod reader;
pub mod writer;

pub use reader::PdfInspector;
pub use writer::{AssembledDocument, PageImage, PdfAssembler};
