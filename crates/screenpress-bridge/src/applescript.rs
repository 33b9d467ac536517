// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// AppleScript capture via `osascript`.
//
// The script receives the target directory as its only argument and is
// expected to save its screenshots there before exiting. Its stdout and
// stderr pass straight through to the terminal.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use screenpress_core::error::{Result, ScreenpressError};
use tracing::{info, instrument};

use crate::traits::ScreenCapture;

/// Interpreter used when none is configured.
pub const OSASCRIPT: &str = "osascript";

/// Runs an AppleScript file that writes screenshots into a directory.
#[derive(Debug, Clone)]
pub struct AppleScriptCapture {
    script: PathBuf,
    interpreter: OsString,
}

impl AppleScriptCapture {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            interpreter: OsString::from(OSASCRIPT),
        }
    }

    /// Run the script with a different program, e.g. a wrapper around
    /// `osascript` or `sh` for a shell-based capture script.
    pub fn with_interpreter(mut self, interpreter: impl Into<OsString>) -> Self {
        self.interpreter = interpreter.into();
        self
    }
}

impl ScreenCapture for AppleScriptCapture {
    fn name(&self) -> &str {
        OSASCRIPT
    }

    #[instrument(skip_all, fields(script = %self.script.display(), dir = %dir.display()))]
    fn capture_into(&self, dir: &Path) -> Result<()> {
        if !self.script.is_file() {
            return Err(ScreenpressError::CaptureScriptMissing {
                path: self.script.clone(),
            });
        }

        info!("Running capture script");
        let status = Command::new(&self.interpreter)
            .arg(&self.script)
            .arg(dir)
            .status()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => ScreenpressError::CaptureUnavailable(format!(
                    "`{}` was not found on PATH",
                    self.interpreter.to_string_lossy()
                )),
                _ => ScreenpressError::Io(err),
            })?;

        if !status.success() {
            return Err(ScreenpressError::CaptureFailed {
                code: status.code(),
            });
        }

        info!("Capture script finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_is_reported_before_running_anything() {
        let dir = tempfile::tempdir().unwrap();
        let capture = AppleScriptCapture::new(dir.path().join("auto_screenshot.applescript"));
        let err = capture.capture_into(dir.path()).unwrap_err();
        assert!(matches!(err, ScreenpressError::CaptureScriptMissing { .. }));
    }

    #[test]
    fn missing_interpreter_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("capture.applescript");
        std::fs::write(&script, "-- nothing").unwrap();

        let capture =
            AppleScriptCapture::new(&script).with_interpreter("screenpress-no-such-interpreter");
        let err = capture.capture_into(dir.path()).unwrap_err();
        assert!(matches!(err, ScreenpressError::CaptureUnavailable(_)));
    }

    #[cfg(unix)]
    #[test]
    fn script_receives_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("capture.sh");
        std::fs::write(&script, "printf shot > \"$1/shot_001.png\"\n").unwrap();
        let target = dir.path().join("captures");
        std::fs::create_dir(&target).unwrap();

        AppleScriptCapture::new(&script)
            .with_interpreter("sh")
            .capture_into(&target)
            .unwrap();
        assert_eq!(std::fs::read(target.join("shot_001.png")).unwrap(), b"shot");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_carries_the_code() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("capture.sh");
        std::fs::write(&script, "exit 3\n").unwrap();

        let err = AppleScriptCapture::new(&script)
            .with_interpreter("sh")
            .capture_into(dir.path())
            .unwrap_err();
        assert!(matches!(err, ScreenpressError::CaptureFailed { code: Some(3) }));
    }
}
