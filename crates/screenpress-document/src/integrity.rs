// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document integrity — SHA-256 fingerprint of the assembled PDF.

use screenpress_core::error::ScreenpressError;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Check that a file on disk still hashes to `expected_hex`.
///
/// Used after writing the PDF to confirm the bytes landed intact.
pub fn verify_file(path: &std::path::Path, expected_hex: &str) -> Result<(), ScreenpressError> {
    let actual = hash_bytes(&std::fs::read(path)?);
    if actual == expected_hex {
        Ok(())
    } else {
        Err(ScreenpressError::PdfError(format!(
            "{} changed after writing: expected sha256 {expected_hex}, got {actual}",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_empty_input() {
        assert_eq!(hash_bytes(b""), EMPTY_SHA256);
    }

    #[test]
    fn hash_known_value() {
        // SHA-256("hello") — verified against coreutils sha256sum.
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(hash_bytes(b"hello"), expected);
    }

    #[test]
    fn verify_detects_modified_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();
        let digest = hash_bytes(b"%PDF-1.7");
        assert!(verify_file(&path, &digest).is_ok());

        std::fs::write(&path, b"%PDF-1.7 tampered").unwrap();
        assert!(matches!(
            verify_file(&path, &digest),
            Err(ScreenpressError::PdfError(_))
        ));
    }
}
