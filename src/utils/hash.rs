// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Content hashing helpers.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of everything `reader` yields, as lowercase hex.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compute the SHA-256 hash of a file and return its lowercase hex digest.
///
/// # Errors
///
/// Returns the underlying I/O error when the file cannot be opened or fully read.
///
/// # Examples
///
/// ```rust,ignore
/// use std::path::Path;
/// let digest = vidpack::utils::hash_file(Path::new("clip.mp4"))?;
/// assert_eq!(digest.len(), 64);
/// ```
pub fn hash_file(path: &Path) -> io::Result<String> {
    hash_reader(File::open(path)?)
}
