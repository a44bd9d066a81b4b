// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The checksum set a `check()` call produces, and the sidecar
//! (`checksums.txt`) it is optionally verified against.

use crate::error::CheckError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Size and content hash recorded for one file in a data part, plus the
/// equivalent pair for its decompressed content when the file carries
/// compressed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChecksum {
    pub size: u64,
    pub hash: String,
    pub uncompressed: Option<(u64, String)>,
}

impl FileChecksum {
    pub fn compressed_only(size: u64, hash: String) -> Self {
        Self {
            size,
            hash,
            uncompressed: None,
        }
    }

    pub fn with_uncompressed(size: u64, hash: String, uncompressed_size: u64, uncompressed_hash: String) -> Self {
        Self {
            size,
            hash,
            uncompressed: Some((uncompressed_size, uncompressed_hash)),
        }
    }
}

/// `file_name -> FileChecksum` map collected while checking a data part, or
/// parsed from its `checksums.txt` sidecar.
///
/// Ordered iteration is not required by the format, but `BTreeMap` gives it
/// to us for free and makes diffed-output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checksums {
    files: BTreeMap<String, FileChecksum>,
}

impl Checksums {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn insert(&mut self, file_name: impl Into<String>, checksum: FileChecksum) {
        self.files.insert(file_name.into(), checksum);
    }

    pub fn get(&self, file_name: &str) -> Option<&FileChecksum> {
        self.files.get(file_name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileChecksum)> {
        self.files.iter()
    }

    /// Compares this checksum set against `other`. In `strict` mode (the
    /// only mode the checker uses) the two sets must name exactly the same
    /// files with identical `{size, hash}` pairs.
    pub fn check_equal(&self, other: &Checksums, strict: bool) -> Result<(), CheckError> {
        if strict {
            for name in self.files.keys() {
                if !other.files.contains_key(name) {
                    return Err(CheckError::corrupted(format!(
                        "checksums.txt is missing file `{name}` present on disk"
                    )));
                }
            }
            for name in other.files.keys() {
                if !self.files.contains_key(name) {
                    return Err(CheckError::corrupted(format!(
                        "checksums.txt names file `{name}` not found on disk"
                    )));
                }
            }
        }
        for (name, expected) in &other.files {
            if let Some(actual) = self.files.get(name) {
                if actual != expected {
                    return Err(CheckError::corrupted(format!(
                        "checksum mismatch for `{name}`: computed {actual:?}, sidecar {expected:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_sets_check_equal_against_themselves() {
        let mut c = Checksums::empty();
        c.insert("x.bin", FileChecksum::compressed_only(10, "abc".into()));
        assert!(c.check_equal(&c, true).is_ok());
    }

    #[test]
    fn missing_file_fails_strict_check() {
        let mut a = Checksums::empty();
        a.insert("x.bin", FileChecksum::compressed_only(10, "abc".into()));
        let b = Checksums::empty();
        assert!(a.check_equal(&b, true).is_err());
    }

    #[test]
    fn hash_mismatch_fails() {
        let mut a = Checksums::empty();
        a.insert("x.bin", FileChecksum::compressed_only(10, "abc".into()));
        let mut b = Checksums::empty();
        b.insert("x.bin", FileChecksum::compressed_only(10, "def".into()));
        assert!(a.check_equal(&b, true).is_err());
    }
}
