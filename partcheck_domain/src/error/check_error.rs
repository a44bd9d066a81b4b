// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Domain error type shared by the Resize dataflow operator and the
//! DataPart integrity checker.
//!
//! Mirrors the error codes in the on-disk format's own checker: structural
//! corruption, mark inconsistency, and schema inconsistency are distinct
//! variants so callers can branch on them instead of matching on message
//! text. Cancellation is deliberately not represented here — the checker
//! returns an empty [`crate::value_objects::Checksums`] instead of an error
//! when asked to stop early.

use crate::value_objects::MarkInCompressedFile;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    /// A stream, mark file, or sidecar did not end where the format requires
    /// (missing EOF, non-zero final-mark row count, primary-key mark count
    /// mismatch, checksum sidecar mismatch).
    #[error("corrupted data: {0}")]
    CorruptedData(String),

    /// The mark file's record for a granule disagrees with the position
    /// actually reached in the compressed/decompressed streams.
    #[error(
        "incorrect mark in {mark_file}: computed {computed:?}, stored {stored:?} (mark #{mark_number})"
    )]
    IncorrectMark {
        computed: MarkInCompressedFile,
        stored: MarkInCompressedFile,
        mark_file: String,
        mark_number: u64,
    },

    /// `columns.txt` named zero columns.
    #[error("empty list of columns passed")]
    EmptyListOfColumnsPassed,

    /// The row count derived from `count.txt` (or the first column checked)
    /// disagrees with a later column's actual row count.
    #[error("sizes of columns don't match: column `{column}` has {actual} rows, expected {expected}")]
    SizesOfColumnsDontMatch {
        column: String,
        expected: u64,
        actual: u64,
    },

    /// An invariant was violated that indicates a bug in the checker itself
    /// rather than a corrupt part (e.g. a substream referenced during
    /// checksum collection that was never opened during the read pass).
    #[error("logical error: {0}")]
    LogicalError(String),

    /// Propagated I/O failure reading the part directory.
    #[error("I/O error: {0}")]
    Io(String),

    /// A text file in the part (`columns.txt`, `checksums.txt`, `count.txt`)
    /// did not parse, or was not fully consumed.
    #[error("parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },
}

impl From<std::io::Error> for CheckError {
    fn from(err: std::io::Error) -> Self {
        CheckError::Io(err.to_string())
    }
}

impl CheckError {
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::CorruptedData(msg.into())
    }

    pub fn logical(msg: impl Into<String>) -> Self {
        Self::LogicalError(msg.into())
    }

    pub fn parse(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Annotates a corrupted-data/logical error with extra positional
    /// context (mark number, row number, file offsets) the way the checker
    /// is required to at each catch site. Leaves structured variants
    /// (`IncorrectMark`, `SizesOfColumnsDontMatch`, ...) untouched since
    /// they already carry their own context.
    pub fn annotate(self, context: impl std::fmt::Display) -> Self {
        match self {
            CheckError::CorruptedData(msg) => CheckError::CorruptedData(format!("{context}: {msg}")),
            CheckError::LogicalError(msg) => CheckError::LogicalError(format!("{context}: {msg}")),
            CheckError::Io(msg) => CheckError::Io(format!("{context}: {msg}")),
            other => other,
        }
    }
}
