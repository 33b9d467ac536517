// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output path resolution.

use std::path::{Component, Path, PathBuf};

use screenpress_core::error::Result;
use tracing::info;

/// Resolve the user-supplied PDF path and make sure its directory exists.
pub fn prepare_output_path(raw: &Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let resolved = resolve_output_path(raw, &cwd, home.as_deref());

    if let Some(parent) = resolved.parent() {
        std::fs::create_dir_all(parent)?;
        info!(dir = %parent.display(), "Output directory ready");
    }
    Ok(resolved)
}

/// Expand a leading `~`, make the path absolute against `cwd`, fold `.` and
/// `..` lexically, and force a `.pdf` extension.
pub fn resolve_output_path(raw: &Path, cwd: &Path, home: Option<&Path>) -> PathBuf {
    let expanded = match (raw.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => raw.to_path_buf(),
    };
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    let mut path = normalize_lexically(&absolute);

    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        path.set_extension("pdf");
        info!(path = %path.display(), "Added .pdf extension to the output path");
    }
    path
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(raw: &str) -> PathBuf {
        resolve_output_path(Path::new(raw), Path::new("/work"), Some(Path::new("/home/sam")))
    }

    #[test]
    fn tilde_expands_to_home() {
        assert_eq!(resolve("~/Documents/MyReport.pdf"), PathBuf::from("/home/sam/Documents/MyReport.pdf"));
    }

    #[test]
    fn relative_paths_join_the_working_directory() {
        assert_eq!(resolve("out/report.pdf"), PathBuf::from("/work/out/report.pdf"));
        assert_eq!(resolve("../report.pdf"), PathBuf::from("/report.pdf"));
    }

    #[test]
    fn pdf_extension_is_forced() {
        assert_eq!(resolve("/tmp/report"), PathBuf::from("/tmp/report.pdf"));
        assert_eq!(resolve("/tmp/report.txt"), PathBuf::from("/tmp/report.pdf"));
        assert_eq!(resolve("/tmp/REPORT.PDF"), PathBuf::from("/tmp/REPORT.PDF"));
    }

    #[test]
    fn tilde_without_home_is_left_alone() {
        let path = resolve_output_path(Path::new("~/r.pdf"), Path::new("/work"), None);
        assert_eq!(path, PathBuf::from("/work/~/r.pdf"));
    }

    #[test]
    fn prepare_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("a").join("b").join("report");
        let path = prepare_output_path(&raw).unwrap();
        assert_eq!(path, dir.path().join("a").join("b").join("report.pdf"));
        assert!(path.parent().unwrap().is_dir());
        assert!(!path.exists());
    }
}
