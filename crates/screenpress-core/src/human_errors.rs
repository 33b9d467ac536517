// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every fatal error is mapped to a plain sentence with a concrete suggestion.
// Severity drives how the binary presents it.

use crate::error::ScreenpressError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Running again may well succeed (the capture was simply empty, disk hiccup).
    Transient,
    /// The user must change something (path, permission, option) first.
    ActionRequired,
    /// The input itself cannot be turned into a PDF.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the user should try next.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a `ScreenpressError` into a `HumanError`.
pub fn humanize_error(err: &ScreenpressError) -> HumanError {
    match err {
        // -- Pipeline --
        ScreenpressError::DirectoryNotFound { path } => HumanError {
            message: "The screenshot folder doesn't exist.".into(),
            suggestion: format!("Check that {} is a directory you can read.", path.display()),
            severity: Severity::ActionRequired,
        },

        ScreenpressError::NoImages { .. } => HumanError {
            message: "No screenshots were found.".into(),
            suggestion: "The capture produced no PNG, JPEG, BMP, GIF or TIFF files. Check the capture script and screen-recording permission, then run again.".into(),
            severity: Severity::Transient,
        },

        ScreenpressError::NoUsableImages { attempted } => HumanError {
            message: "None of the screenshots could be read.".into(),
            suggestion: format!("All {attempted} captured files were empty or damaged. Run the capture again."),
            severity: Severity::Transient,
        },

        ScreenpressError::EmptyInput => HumanError {
            message: "There were no pages to put in the PDF.".into(),
            suggestion: "Run the capture again and make sure it saves at least one screenshot.".into(),
            severity: Severity::Transient,
        },

        ScreenpressError::EncodingError(detail) => HumanError {
            message: "The PDF couldn't be built from these screenshots.".into(),
            suggestion: format!("One of the images is in a format the PDF writer can't embed. ({detail})"),
            severity: Severity::Permanent,
        },

        ScreenpressError::ImageError(_) => HumanError {
            message: "There's a problem with one of the screenshots.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try capturing it again as PNG.".into(),
            severity: Severity::Permanent,
        },

        ScreenpressError::PdfError(_) => HumanError {
            message: "The written PDF couldn't be read back.".into(),
            suggestion: "The file may be incomplete. Check there is enough disk space and run again.".into(),
            severity: Severity::Transient,
        },

        // -- Configuration --
        ScreenpressError::InvalidConfig(detail) => HumanError {
            message: "One of the options isn't valid.".into(),
            suggestion: format!("Fix the option and run again. ({detail})"),
            severity: Severity::ActionRequired,
        },

        // -- Capture --
        ScreenpressError::CaptureScriptMissing { path } => HumanError {
            message: "The capture script is missing.".into(),
            suggestion: format!(
                "Place the AppleScript at {} or pass --script with its location.",
                path.display()
            ),
            severity: Severity::ActionRequired,
        },

        ScreenpressError::CaptureFailed { code } => HumanError {
            message: "Taking the screenshots failed.".into(),
            suggestion: match code {
                Some(code) => format!("The capture script exited with status {code}. Check its output above."),
                None => "The capture script was stopped by a signal.".into(),
            },
            severity: Severity::Transient,
        },

        ScreenpressError::CaptureUnavailable(_) => HumanError {
            message: "Screen capture isn't available here.".into(),
            suggestion: "Capture needs macOS with `osascript`. Use --input-dir to bind screenshots you already have.".into(),
            severity: Severity::Permanent,
        },

        // -- Storage --
        ScreenpressError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file or folder couldn't be found.".into(),
                    suggestion: "Check the paths you passed and try again.".into(),
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Screenpress doesn't have permission to use that location.".into(),
                    suggestion: "Check the folder permissions, or choose an output path in your home directory.".into(),
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    severity: Severity::Transient,
                }
            }
        }

        ScreenpressError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Check that it is valid JSON.".into(),
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_capture_is_transient() {
        let human = humanize_error(&ScreenpressError::NoImages {
            path: "/tmp/x".into(),
        });
        assert_eq!(human.severity, Severity::Transient);
    }

    #[test]
    fn encoding_error_is_permanent_and_keeps_detail() {
        let err = ScreenpressError::EncodingError("page 2: unsupported colour mode".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.suggestion.contains("page 2"));
    }

    #[test]
    fn missing_script_names_the_path() {
        let err = ScreenpressError::CaptureScriptMissing {
            path: "/opt/auto_screenshot.applescript".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("/opt/auto_screenshot.applescript"));
    }

    #[test]
    fn permission_denied_is_action_required() {
        let err = ScreenpressError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
