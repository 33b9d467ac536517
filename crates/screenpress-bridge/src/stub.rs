// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub capture for platforms without a capture backend (Linux, Windows, CI).

use std::path::Path;

use screenpress_core::error::{Result, ScreenpressError};

use crate::traits::ScreenCapture;

/// Always reports that capture is unavailable.
pub struct StubCapture;

impl ScreenCapture for StubCapture {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn capture_into(&self, _dir: &Path) -> Result<()> {
        tracing::warn!("ScreenCapture::capture_into called on stub capture");
        Err(ScreenpressError::CaptureUnavailable(
            std::env::consts::OS.to_string(),
        ))
    }
}
