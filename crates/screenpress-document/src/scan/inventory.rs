// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image inventory — list a capture directory, keep the supported image files,
// and order them by filename. That order is the page order of the final PDF.

use std::path::{Path, PathBuf};

use screenpress_core::ImageKind;
use screenpress_core::error::{Result, ScreenpressError};
use tracing::{debug, info, instrument};

/// One screenshot found in a capture directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    path: PathBuf,
    kind: ImageKind,
}

impl ImageAsset {
    /// Build an asset from a path, or `None` if its extension is not supported.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let kind = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageKind::from_extension)?;
        Some(Self { path, kind })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format inferred from the file extension.
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// File name for log lines.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Read the file exactly as it is on disk.
    pub fn read_original(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// The ordered screenshots of one capture session.
///
/// Built once by [`scan_directory`] and never reordered: index `i` is page
/// `i + 1` of the output.
#[derive(Debug, Clone, Default)]
pub struct CaptureSet {
    assets: Vec<ImageAsset>,
}

impl CaptureSet {
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageAsset> {
        self.assets.iter()
    }

    pub fn assets(&self) -> &[ImageAsset] {
        &self.assets
    }
}

impl<'a> IntoIterator for &'a CaptureSet {
    type Item = &'a ImageAsset;
    type IntoIter = std::slice::Iter<'a, ImageAsset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}

/// List `dir` and return its supported image files sorted by filename.
///
/// Subdirectories and files with other extensions are skipped. An existing
/// directory without any images yields an empty set; deciding whether that is
/// a failure is up to the caller.
#[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
pub fn scan_directory(dir: impl AsRef<Path>) -> Result<CaptureSet> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ScreenpressError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut assets = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match ImageAsset::from_path(path) {
            Some(asset) => assets.push(asset),
            None => debug!("Skipping non-image entry"),
        }
    }

    assets.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    for asset in &assets {
        debug!(file = %asset.file_name(), kind = ?asset.kind, "Found image");
    }
    info!(count = assets.len(), "Capture directory scanned");

    Ok(CaptureSet { assets })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = scan_directory(&missing).unwrap_err();
        assert!(matches!(err, ScreenpressError::DirectoryNotFound { path } if path == missing));
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.png");
        let err = scan_directory(dir.path().join("a.png")).unwrap_err();
        assert!(matches!(err, ScreenpressError::DirectoryNotFound { .. }));
    }

    #[test]
    fn empty_directory_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let set = scan_directory(dir.path()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn only_non_images_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "capture.tif");
        touch(dir.path(), "README");
        let set = scan_directory(dir.path()).unwrap();
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn filters_and_sorts_by_filename() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "c.png");
        touch(dir.path(), "a.PNG");
        touch(dir.path(), "b.jpeg");
        touch(dir.path(), "e.tiff");
        touch(dir.path(), "d.Gif");
        touch(dir.path(), "f.bmp");
        touch(dir.path(), "notes.txt");
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let set = scan_directory(dir.path()).unwrap();
        let names: Vec<String> = set.iter().map(ImageAsset::file_name).collect();
        assert_eq!(names, ["a.PNG", "b.jpeg", "c.png", "d.Gif", "e.tiff", "f.bmp"]);
        assert_eq!(set.assets()[1].kind(), ImageKind::Jpeg);
    }

    #[test]
    fn numbered_captures_keep_lexicographic_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["shot_010.png", "shot_002.png", "shot_001.png"] {
            touch(dir.path(), name);
        }
        let set = scan_directory(dir.path()).unwrap();
        let names: Vec<String> = set.iter().map(ImageAsset::file_name).collect();
        assert_eq!(names, ["shot_001.png", "shot_002.png", "shot_010.png"]);
    }
}
