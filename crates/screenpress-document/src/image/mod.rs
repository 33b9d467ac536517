// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — width limiting, grayscale, alpha flattening, and the
// per-image normaliser built on top of them.

pub mod normalize;
pub mod processor;

pub use normalize::{ImageNormalizer, Normalize, NormalizedAsset};
pub use processor::ImageProcessor;
