// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The `PartChecker` port: the boundary between this crate's pure domain
//! types and the filesystem I/O needed to actually validate a data part.
//!
//! Reading compressed column files, mark files, and the primary index is
//! infrastructure work, so this trait is defined here (the domain decides
//! the shape of the operation) and implemented in the `partcheck`
//! application crate (which owns the actual file access).

use crate::error::CheckError;
use crate::value_objects::{ColumnType, IndexSpec, IndexGranularity, PrimitiveType, Checksums};
use async_trait::async_trait;
use std::path::Path;

/// One of `.mrk` (legacy, 16-byte records) or `.mrk2` (extended, 24-byte
/// records with a row count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkFileExtension {
    Legacy,
    Extended,
}

impl MarkFileExtension {
    pub fn suffix(self) -> &'static str {
        match self {
            MarkFileExtension::Legacy => ".mrk",
            MarkFileExtension::Extended => ".mrk2",
        }
    }

    pub fn is_extended(self) -> bool {
        matches!(self, MarkFileExtension::Extended)
    }
}

/// Everything the checker needs to know about a part that isn't discoverable
/// by reading the part directory itself.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub granularity: IndexGranularity,
    pub mark_ext: MarkFileExtension,
    pub require_checksums: bool,
    pub pk_types: Vec<PrimitiveType>,
    pub indices: Vec<IndexSpec>,
}

/// A cooperative cancellation predicate, polled at granule boundaries.
///
/// Implementations outside tests typically wrap an atomic flag flipped by a
/// signal handler or a coordinating shutdown task; see the bootstrap crate's
/// shutdown coordinator.
pub trait CancellationToken: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

impl CancellationToken for std::sync::atomic::AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(std::sync::atomic::Ordering::Relaxed)
    }
}

/// Validates one on-disk data part and returns the checksums of every file
/// it read.
///
/// Implementations must honor cancellation as a non-error outcome: if
/// `cancel.is_cancelled()` becomes true mid-check, the result is
/// `Ok(Checksums::empty())`, never an `Err`.
#[async_trait]
pub trait PartChecker: Send + Sync {
    async fn check(
        &self,
        path: &Path,
        columns: &[ColumnType],
        request: &CheckRequest,
        cancel: &(dyn CancellationToken + 'static),
    ) -> Result<Checksums, CheckError>;
}
