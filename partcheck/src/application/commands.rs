// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Application Commands
//!
//! Commands represent a single requested operation against the domain,
//! immutable and self-contained, handed to a use case for execution.

use partcheck_domain::services::MarkFileExtension;
use partcheck_domain::value_objects::{IndexGranularity, IndexSpec, PrimitiveType};
use std::path::PathBuf;

/// Command to validate one on-disk data part.
#[derive(Debug, Clone)]
pub struct CheckPartCommand {
    /// Directory containing the part's column, mark, and sidecar files.
    pub part_path: PathBuf,
    /// Path to the part's `columns.txt`, if it differs from
    /// `part_path/columns.txt`.
    pub columns_path: Option<PathBuf>,
    pub granularity: IndexGranularity,
    pub mark_extension: MarkFileExtension,
    pub require_checksums: bool,
    pub pk_types: Vec<PrimitiveType>,
    pub indices: Vec<IndexSpec>,
}

impl CheckPartCommand {
    pub fn new(part_path: PathBuf, granularity: IndexGranularity) -> Self {
        Self {
            part_path,
            columns_path: None,
            granularity,
            mark_extension: MarkFileExtension::Legacy,
            require_checksums: true,
            pk_types: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn with_mark_extension(mut self, mark_extension: MarkFileExtension) -> Self {
        self.mark_extension = mark_extension;
        self
    }

    pub fn with_require_checksums(mut self, require_checksums: bool) -> Self {
        self.require_checksums = require_checksums;
        self
    }

    pub fn with_primary_key(mut self, pk_types: Vec<PrimitiveType>) -> Self {
        self.pk_types = pk_types;
        self
    }

    pub fn with_indices(mut self, indices: Vec<IndexSpec>) -> Self {
        self.indices = indices;
        self
    }
}

/// Result of a [`CheckPartCommand`]: either a full checksum set, or an
/// empty one if the check was cancelled before completion.
#[derive(Debug)]
pub struct CheckPartResult {
    pub checksums: partcheck_domain::value_objects::Checksums,
    pub cancelled: bool,
}

/// Command to drive a Resize operator over a scripted sequence of port
/// events and report the verdict trace.
#[derive(Debug, Clone)]
pub struct ResizeSimCommand {
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub script: Vec<crate::infrastructure::adapters::resize_script::ScriptEvent>,
    pub event_driven: bool,
}

/// One script line's effect, in execution order, for trace rendering.
#[derive(Debug)]
pub enum ResizeSimStep {
    Filled { index: usize, bytes: usize },
    Finished { index: usize },
    Prepared { verdict: partcheck_domain::Verdict },
    Drained { index: usize, chunk: Option<Vec<u8>> },
}

#[derive(Debug)]
pub struct ResizeSimResult {
    pub steps: Vec<ResizeSimStep>,
}
