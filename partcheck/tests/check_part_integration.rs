// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end coverage of [`CheckPartUseCase`] against
//! [`FilesystemPartChecker`] over real temp-directory parts: a clean part,
//! a declared-row-count mismatch, a corrupted mark, and cancellation
//! requested before the check starts.

use partcheck::application::commands::CheckPartCommand;
use partcheck::application::use_cases::CheckPartUseCase;
use partcheck::infrastructure::adapters::compressed_block;
use partcheck::infrastructure::services::FilesystemPartChecker;
use partcheck_domain::value_objects::IndexGranularity;
use prometheus::IntGauge;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

fn write_mark(buf: &mut Vec<u8>, offset_in_compressed: u64, offset_in_block: u64) {
    buf.extend_from_slice(&offset_in_compressed.to_le_bytes());
    buf.extend_from_slice(&offset_in_block.to_le_bytes());
}

fn write_single_granule_column(dir: &Path, rows: &[u64]) {
    let mut bin = Vec::new();
    let mut payload = Vec::new();
    for row in rows {
        payload.extend_from_slice(&row.to_le_bytes());
    }
    compressed_block::write_block(&mut bin, &payload);
    std::fs::write(dir.join("id.bin"), &bin).unwrap();

    let mut mrk = Vec::new();
    write_mark(&mut mrk, 0, 0);
    std::fs::write(dir.join("id.mrk"), &mrk).unwrap();
}

fn write_columns_txt(dir: &Path) {
    std::fs::write(dir.join("columns.txt"), "columns format version: 1\n1 columns:\nid UInt64\n").unwrap();
}

fn use_case() -> CheckPartUseCase {
    let gauge = IntGauge::new("test_checks_in_flight", "test").unwrap();
    CheckPartUseCase::new(Arc::new(FilesystemPartChecker::new(gauge)))
}

#[tokio::test]
async fn clean_part_checks_successfully() {
    let dir = tempfile::tempdir().unwrap();
    write_columns_txt(dir.path());
    write_single_granule_column(dir.path(), &[8, 9]);

    let command = CheckPartCommand::new(dir.path().to_path_buf(), IndexGranularity::uniform(1, 2, false))
        .with_require_checksums(false);
    let cancel = AtomicBool::new(false);

    let result = use_case().execute(&command, &cancel).await.unwrap();
    assert!(!result.cancelled);
    assert!(result.checksums.get("id.bin").is_some());
    assert!(result.checksums.get("id.mrk").is_some());
}

#[tokio::test]
async fn declared_row_count_mismatch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_columns_txt(dir.path());
    write_single_granule_column(dir.path(), &[8, 9]);
    std::fs::write(dir.path().join("count.txt"), "999").unwrap();

    let command = CheckPartCommand::new(dir.path().to_path_buf(), IndexGranularity::uniform(1, 2, false))
        .with_require_checksums(false);
    let cancel = AtomicBool::new(false);

    let err = use_case().execute(&command, &cancel).await.unwrap_err();
    assert!(err.to_string().contains("checking part"));
}

#[tokio::test]
async fn corrupted_mark_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_columns_txt(dir.path());
    write_single_granule_column(dir.path(), &[8, 9]);
    // Claim the granule starts 1000 bytes into the compressed stream, which
    // the single block actually written never reaches.
    let mut mrk = Vec::new();
    write_mark(&mut mrk, 1000, 0);
    std::fs::write(dir.path().join("id.mrk"), &mrk).unwrap();

    let command = CheckPartCommand::new(dir.path().to_path_buf(), IndexGranularity::uniform(1, 2, false))
        .with_require_checksums(false);
    let cancel = AtomicBool::new(false);

    assert!(use_case().execute(&command, &cancel).await.is_err());
}

#[tokio::test]
async fn cancellation_before_the_check_starts_yields_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    write_columns_txt(dir.path());
    write_single_granule_column(dir.path(), &[8, 9]);

    let command = CheckPartCommand::new(dir.path().to_path_buf(), IndexGranularity::uniform(1, 2, false))
        .with_require_checksums(false);
    let cancel = AtomicBool::new(true);

    let result = use_case().execute(&command, &cancel).await.unwrap();
    assert!(result.cancelled);
    assert!(result.checksums.is_empty());
}
