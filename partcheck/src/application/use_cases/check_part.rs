// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Check Part Use Case
//!
//! Validates one on-disk data part: reads its `columns.txt`, builds the
//! domain's [`CheckRequest`], and delegates the actual file walk to a
//! [`PartChecker`] implementation.
//!
//! ## Responsibilities
//!
//! - Load and parse `columns.txt` from the part directory (or an override
//!   path)
//! - Translate a [`CheckPartCommand`] into a [`CheckRequest`]
//! - Invoke the checker and report whether the result reflects a completed
//!   check or an early cancellation
//!
//! ## Dependencies
//!
//! - **PartChecker**: performs the actual filesystem validation

use crate::application::commands::{CheckPartCommand, CheckPartResult};
use crate::infrastructure::adapters::columns_txt;
use anyhow::{Context, Result};
use partcheck_domain::{CancellationToken, CheckRequest, PartChecker};
use std::sync::Arc;
use tracing::{info, warn};

pub struct CheckPartUseCase {
    checker: Arc<dyn PartChecker>,
}

impl CheckPartUseCase {
    pub fn new(checker: Arc<dyn PartChecker>) -> Self {
        Self { checker }
    }

    /// Executes the check: loads `columns.txt`, builds a [`CheckRequest`]
    /// from `command`, and runs the checker against `cancel`.
    pub async fn execute(
        &self,
        command: &CheckPartCommand,
        cancel: &(dyn CancellationToken + 'static),
    ) -> Result<CheckPartResult> {
        let columns_path = command
            .columns_path
            .clone()
            .unwrap_or_else(|| command.part_path.join("columns.txt"));

        info!(part = %command.part_path.display(), "starting part check");

        let columns_text = tokio::fs::read_to_string(&columns_path)
            .await
            .with_context(|| format!("reading {}", columns_path.display()))?;
        let columns = columns_txt::parse(&columns_text).context("parsing columns.txt")?;

        let request = CheckRequest {
            granularity: command.granularity.clone(),
            mark_ext: command.mark_extension,
            require_checksums: command.require_checksums,
            pk_types: command.pk_types.clone(),
            indices: command.indices.clone(),
        };

        let checksums = self
            .checker
            .check(&command.part_path, &columns, &request, cancel)
            .await
            .with_context(|| format!("checking part {}", command.part_path.display()))?;

        let cancelled = checksums.is_empty() && cancel.is_cancelled();
        if cancelled {
            warn!(part = %command.part_path.display(), "part check cancelled before completion");
        } else {
            info!(part = %command.part_path.display(), files = checksums.len(), "part check passed");
        }

        Ok(CheckPartResult { checksums, cancelled })
    }
}
