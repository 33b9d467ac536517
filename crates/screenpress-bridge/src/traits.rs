// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic capture trait.

use std::path::Path;

use screenpress_core::error::Result;

/// Something that can fill a directory with screenshots.
///
/// Implementations block until capture has finished. What ends up in the
/// directory, and how the files are named, is up to the implementation; the
/// pipeline orders pages by filename afterwards.
pub trait ScreenCapture {
    /// Short name for logs (e.g. "osascript").
    fn name(&self) -> &str;

    /// Capture into `dir`, which already exists.
    fn capture_into(&self, dir: &Path) -> Result<()>;
}
