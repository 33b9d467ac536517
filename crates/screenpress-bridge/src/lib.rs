// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// screenpress-bridge — Screen capture collaborators.
//
// The capture step is an external process that fills a directory with
// screenshots. This crate defines the trait the app drives and the platform
// implementations behind it.

use std::path::PathBuf;

pub mod applescript;
pub mod traits;

#[cfg(not(target_os = "macos"))]
pub mod stub;

pub use applescript::AppleScriptCapture;
pub use traits::ScreenCapture;

/// The capture implementation for the target operating system.
///
/// On macOS this runs `script` through `osascript`; everywhere else capture
/// is unavailable and the returned stub says so.
pub fn platform_capture(script: impl Into<PathBuf>) -> Box<dyn ScreenCapture> {
    #[cfg(target_os = "macos")]
    {
        Box::new(AppleScriptCapture::new(script))
    }
    #[cfg(not(target_os = "macos"))]
    {
        let script: PathBuf = script.into();
        tracing::debug!(script = %script.display(), "No capture backend on this platform");
        Box::new(stub::StubCapture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn non_mac_platforms_get_the_stub() {
        let capture = platform_capture("/nonexistent/auto_screenshot.applescript");
        assert_eq!(capture.name(), "unavailable");
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn mac_gets_applescript() {
        let capture = platform_capture("/nonexistent/auto_screenshot.applescript");
        assert_eq!(capture.name(), "osascript");
    }
}
