// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Index granularity: the per-mark row-count descriptor a part's primary
//! index is built against.

use crate::error::CheckError;

/// Sequence of per-mark row counts, with an optional trailing zero-row
/// sentinel marking the end of the stream.
///
/// # Developer Notes
///
/// `has_final_mark` tracks whether `mark_rows` already includes that
/// sentinel entry (row count 0) as its last element; `marks_count()`
/// counts it like any other mark, matching `getMarksCount()`'s behavior
/// in the on-disk format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGranularity {
    mark_rows: Vec<u64>,
    has_final_mark: bool,
}

impl IndexGranularity {
    pub fn new(mark_rows: Vec<u64>) -> Self {
        let has_final_mark = mark_rows.last() == Some(&0) && mark_rows.len() > 1;
        Self {
            mark_rows,
            has_final_mark,
        }
    }

    /// Builds a uniform granularity of `granule_count` marks of
    /// `rows_per_granule` rows each, optionally terminated by the
    /// zero-row sentinel.
    pub fn uniform(granule_count: u64, rows_per_granule: u64, final_mark: bool) -> Self {
        let mut mark_rows: Vec<u64> = (0..granule_count).map(|_| rows_per_granule).collect();
        if final_mark {
            mark_rows.push(0);
        }
        Self {
            mark_rows,
            has_final_mark: final_mark,
        }
    }

    pub fn mark_rows(&self, index: usize) -> Result<u64, CheckError> {
        self.mark_rows
            .get(index)
            .copied()
            .ok_or_else(|| CheckError::logical(format!("mark index {index} out of range")))
    }

    pub fn marks_count(&self) -> usize {
        self.mark_rows.len()
    }

    pub fn has_final_mark(&self) -> bool {
        self.has_final_mark
    }
}
