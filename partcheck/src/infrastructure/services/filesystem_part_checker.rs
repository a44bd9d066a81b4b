// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `FilesystemPartChecker`: the concrete [`PartChecker`] reading a data part
//! directly off local disk.
//!
//! Runs the full validation procedure against the part directory: the
//! primary index, the part-wide auxiliary files, every secondary index, and
//! every column's substreams, finishing with an optional strict comparison
//! against a `checksums.txt` sidecar. Cancellation is polled between each of
//! these stages and returns `Ok(Checksums::empty())` rather than an error,
//! per the port's contract.

use crate::infrastructure::adapters::stream::Stream;
use async_trait::async_trait;
use partcheck_domain::value_objects::{Checksums, ColumnType, FileChecksum, IndexGranularity, IndexSpec};
use partcheck_domain::{CancellationToken, CheckError, CheckRequest, PartChecker};
use sha2::{Digest, Sha256};
use std::path::Path;

pub struct FilesystemPartChecker {
    in_flight: prometheus::IntGauge,
}

impl FilesystemPartChecker {
    pub fn new(in_flight: prometheus::IntGauge) -> Self {
        Self { in_flight }
    }
}

#[async_trait]
impl PartChecker for FilesystemPartChecker {
    async fn check(
        &self,
        path: &Path,
        columns: &[ColumnType],
        request: &CheckRequest,
        cancel: &(dyn CancellationToken + 'static),
    ) -> Result<Checksums, CheckError> {
        self.in_flight.inc();
        let _guard = scopeguard::guard(&self.in_flight, |gauge| gauge.dec());

        // `check_part` is entirely synchronous disk I/O and CPU-bound
        // hashing; `block_in_place` hands this worker thread's other tasks
        // to the rest of the pool instead of stalling them for the
        // duration of the check.
        tokio::task::block_in_place(|| check_part(path, columns, request, cancel))
    }
}

fn check_part(
    path: &Path,
    columns: &[ColumnType],
    request: &CheckRequest,
    cancel: &dyn CancellationToken,
) -> Result<Checksums, CheckError> {
    if columns.is_empty() {
        return Err(CheckError::EmptyListOfColumnsPassed);
    }

    let checksums_txt = read_checksums_sidecar(path)?;
    let mut checksums = Checksums::empty();

    if cancel.is_cancelled() {
        return Ok(Checksums::empty());
    }

    if !request.pk_types.is_empty() {
        check_primary_index(path, request, &mut checksums)?;
    }

    if cancel.is_cancelled() {
        return Ok(Checksums::empty());
    }

    let declared_rows = check_auxiliary_files(path, &mut checksums)?;

    for index in &request.indices {
        if cancel.is_cancelled() {
            return Ok(Checksums::empty());
        }
        check_index(path, index, request, &mut checksums)?;
    }

    if cancel.is_cancelled() {
        return Ok(Checksums::empty());
    }

    // Rows are seeded from count.txt if present, otherwise from the first
    // column checked; every column after that is compared against it, named
    // individually in the error the way the original names the offending
    // column rather than the sidecar that merely supplied the baseline.
    let mut expected_rows = declared_rows;
    for column in columns {
        if cancel.is_cancelled() {
            return Ok(Checksums::empty());
        }
        let column_rows = check_column(path, column, request, &mut checksums)?;
        match expected_rows {
            Some(expected) if expected != column_rows => {
                return Err(CheckError::SizesOfColumnsDontMatch {
                    column: column.name.clone(),
                    expected,
                    actual: column_rows,
                });
            }
            Some(_) => {}
            None => expected_rows = Some(column_rows),
        }
    }

    // Open Question: with no checksums.txt on disk and require_checksums
    // false, the part is accepted without ever comparing against a
    // sidecar — the `check_equal` call below is skipped entirely.
    if request.require_checksums || !checksums_txt.is_empty() {
        checksums.check_equal(&checksums_txt, true)?;
    }

    Ok(checksums)
}

fn read_checksums_sidecar(path: &Path) -> Result<Checksums, CheckError> {
    let sidecar_path = path.join("checksums.txt");
    match std::fs::read_to_string(&sidecar_path) {
        Ok(text) => serde_json::from_str(&text)
            .map_err(|e| CheckError::parse("checksums.txt", e.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Checksums::empty()),
        Err(e) => Err(e.into()),
    }
}

fn data_marks_count(granularity: &IndexGranularity) -> usize {
    granularity.marks_count() - if granularity.has_final_mark() { 1 } else { 0 }
}

fn hash_file(path: &Path) -> Result<Option<FileChecksum>, CheckError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            Ok(Some(FileChecksum::compressed_only(bytes.len() as u64, hex::encode(hasher.finalize()))))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn check_primary_index(path: &Path, request: &CheckRequest, checksums: &mut Checksums) -> Result<(), CheckError> {
    let idx_path = path.join("primary.idx");
    let bytes = std::fs::read(&idx_path)
        .map_err(|e| CheckError::from(e).annotate("reading primary.idx"))?;

    let row_width: u64 = request.pk_types.iter().map(|t| t.fixed_width()).sum();
    if row_width == 0 || bytes.len() as u64 % row_width != 0 {
        return Err(CheckError::corrupted(format!(
            "primary.idx size {} is not a multiple of the primary key row width {row_width}",
            bytes.len()
        )));
    }

    let entries = bytes.len() as u64 / row_width;
    // Includes the final sentinel mark, unlike the per-column data streams:
    // primary.idx carries one tuple per mark in getMarksCount(), sentinel
    // included, not just the data marks.
    let expected = request.granularity.marks_count() as u64;
    if entries != expected {
        return Err(CheckError::corrupted(format!(
            "primary.idx has {entries} entries, expected {expected} (one per mark)"
        )));
    }

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    checksums.insert(
        "primary.idx",
        FileChecksum::compressed_only(bytes.len() as u64, hex::encode(hasher.finalize())),
    );
    Ok(())
}

/// Hashes the part's remaining top-level sidecar files and, when present,
/// parses `count.txt`'s declared row count.
fn check_auxiliary_files(path: &Path, checksums: &mut Checksums) -> Result<Option<u64>, CheckError> {
    let mut declared_rows = None;

    if let Some(checksum) = hash_file(&path.join("count.txt"))? {
        let text = std::fs::read_to_string(path.join("count.txt"))?;
        let count: u64 = text
            .trim()
            .parse()
            .map_err(|_| CheckError::parse("count.txt", format!("not an integer: `{}`", text.trim())))?;
        declared_rows = Some(count);
        checksums.insert("count.txt", checksum);
    }

    for name in ["partition.dat", "ttl.txt"] {
        if let Some(checksum) = hash_file(&path.join(name))? {
            checksums.insert(name, checksum);
        }
    }

    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(declared_rows),
        Err(e) => return Err(e.into()),
    };
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if file_name.starts_with("minmax_") {
            if let Some(checksum) = hash_file(&entry.path())? {
                checksums.insert(file_name.into_owned(), checksum);
            }
        }
    }

    Ok(declared_rows)
}

fn check_index(path: &Path, spec: &IndexSpec, request: &CheckRequest, checksums: &mut Checksums) -> Result<(), CheckError> {
    let mut stream = Stream::open(path, &spec.file_name, ".idx", request.mark_ext.suffix())
        .map_err(|e| e.annotate(format!("opening secondary index `{}`", spec.name)))?;

    let extended = request.mark_ext.is_extended();
    for _ in 0..data_marks_count(&request.granularity) {
        stream.assert_mark(false, extended, &request.granularity)?;
        stream.consume(spec.granule_width)?;
    }
    stream.assert_end(&request.granularity)?;
    stream.save_checksums(checksums);
    Ok(())
}

/// Validates every substream of `column` and returns the row count implied
/// by its [`row_counting_substream`](ColumnType::row_counting_substream) —
/// the one substream with exactly one fixed-width entry per row, used by
/// the caller to cross-check this column's row count against every other
/// column's (and, where present, `count.txt`'s declared count).
fn check_column(path: &Path, column: &ColumnType, request: &CheckRequest, checksums: &mut Checksums) -> Result<u64, CheckError> {
    let extended = request.mark_ext.is_extended();
    let row_counting_substream = column.row_counting_substream();
    let mut column_rows = 0u64;

    for substream in column.substreams() {
        let file_name = substream.file_name(&column.name);
        let mut stream = Stream::open(path, &file_name, ".bin", request.mark_ext.suffix())
            .map_err(|e| e.annotate(format!("opening column `{}`", column.name)))?;

        if substream.is_dictionary_keys() {
            // Read non-monotonically; position is never checked, only that
            // every byte of both files is accounted for in the checksums.
            stream.consume_all()?;
            stream.drain_marks()?;
        } else {
            let width = substream
                .fixed_row_width(column.element_type)
                .ok_or_else(|| CheckError::logical(format!("substream for `{}` has no fixed row width", column.name)))?;
            let counts_rows = substream == row_counting_substream;
            for i in 0..data_marks_count(&request.granularity) {
                stream.assert_mark(false, extended, &request.granularity)?;
                let rows = request.granularity.mark_rows(i)?;
                stream.consume(rows * width)?;
                if counts_rows {
                    column_rows += rows;
                }
            }
            stream.assert_end(&request.granularity)?;
        }

        stream.save_checksums(checksums);
    }

    Ok(column_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::compressed_block;
    use partcheck_domain::value_objects::{ColumnKind, PrimitiveType};
    use partcheck_domain::{CheckRequest, MarkFileExtension};
    use std::sync::atomic::AtomicBool;
    use tempfile::tempdir;

    fn write_mark(buf: &mut Vec<u8>, offset_in_compressed: u64, offset_in_block: u64) {
        buf.extend_from_slice(&offset_in_compressed.to_le_bytes());
        buf.extend_from_slice(&offset_in_block.to_le_bytes());
    }

    /// Builds a single-column, single-granule part with no primary key,
    /// no secondary indices, and a matching `checksums.txt`, then checks it
    /// with no cancellation requested.
    #[test]
    fn checks_a_clean_single_column_part() {
        let dir = tempdir().unwrap();
        let granularity = IndexGranularity::uniform(1, 2, false);

        let mut bin = Vec::new();
        compressed_block::write_block(&mut bin, &8u64.to_le_bytes());
        compressed_block::write_block(&mut bin, &9u64.to_le_bytes());
        std::fs::write(dir.path().join("id.bin"), &bin).unwrap();

        let mut mrk = Vec::new();
        write_mark(&mut mrk, 0, 0);
        std::fs::write(dir.path().join("id.mrk"), &mrk).unwrap();

        let column = ColumnType {
            name: "id".to_string(),
            kind: ColumnKind::Plain,
            element_type: PrimitiveType::UInt64,
        };
        let request = CheckRequest {
            granularity,
            mark_ext: MarkFileExtension::Legacy,
            require_checksums: false,
            pk_types: Vec::new(),
            indices: Vec::new(),
        };

        let cancel = AtomicBool::new(false);
        let result = check_part(dir.path(), &[column], &request, &cancel).unwrap();
        assert!(result.get("id.bin").is_some());
        assert!(result.get("id.mrk").is_some());
    }

    #[test]
    fn empty_column_list_is_rejected() {
        let dir = tempdir().unwrap();
        let request = CheckRequest {
            granularity: IndexGranularity::uniform(1, 2, false),
            mark_ext: MarkFileExtension::Legacy,
            require_checksums: false,
            pk_types: Vec::new(),
            indices: Vec::new(),
        };
        let cancel = AtomicBool::new(false);
        let err = check_part(dir.path(), &[], &request, &cancel).unwrap_err();
        assert!(matches!(err, CheckError::EmptyListOfColumnsPassed));
    }

    #[test]
    fn cancellation_before_any_work_returns_empty_checksums() {
        let dir = tempdir().unwrap();
        let column = ColumnType {
            name: "id".to_string(),
            kind: ColumnKind::Plain,
            element_type: PrimitiveType::UInt64,
        };
        let request = CheckRequest {
            granularity: IndexGranularity::uniform(1, 2, false),
            mark_ext: MarkFileExtension::Legacy,
            require_checksums: false,
            pk_types: Vec::new(),
            indices: Vec::new(),
        };
        let cancel = AtomicBool::new(true);
        let result = check_part(dir.path(), &[column], &request, &cancel).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn mismatched_declared_row_count_is_rejected() {
        let dir = tempdir().unwrap();
        let granularity = IndexGranularity::uniform(1, 2, false);

        let mut bin = Vec::new();
        compressed_block::write_block(&mut bin, &8u64.to_le_bytes());
        compressed_block::write_block(&mut bin, &9u64.to_le_bytes());
        std::fs::write(dir.path().join("id.bin"), &bin).unwrap();
        let mut mrk = Vec::new();
        write_mark(&mut mrk, 0, 0);
        std::fs::write(dir.path().join("id.mrk"), &mrk).unwrap();
        std::fs::write(dir.path().join("count.txt"), "999").unwrap();

        let column = ColumnType {
            name: "id".to_string(),
            kind: ColumnKind::Plain,
            element_type: PrimitiveType::UInt64,
        };
        let request = CheckRequest {
            granularity,
            mark_ext: MarkFileExtension::Legacy,
            require_checksums: false,
            pk_types: Vec::new(),
            indices: Vec::new(),
        };
        let cancel = AtomicBool::new(false);
        let err = check_part(dir.path(), &[column], &request, &cancel).unwrap_err();
        match err {
            CheckError::SizesOfColumnsDontMatch { column, expected, actual } => {
                assert_eq!(column, "id", "the offending column should be named, not the sidecar");
                assert_eq!(expected, 999);
                assert_eq!(actual, 2);
            }
            other => panic!("expected SizesOfColumnsDontMatch, got {other:?}"),
        }
    }

    #[test]
    fn primary_index_entry_count_includes_the_final_sentinel_mark() {
        let dir = tempdir().unwrap();
        // One data granule plus a trailing zero-row sentinel: primary.idx
        // must carry one UInt64 tuple per mark, sentinel included.
        let granularity = IndexGranularity::uniform(1, 2, true);

        let mut bin = Vec::new();
        compressed_block::write_block(&mut bin, &8u64.to_le_bytes());
        compressed_block::write_block(&mut bin, &9u64.to_le_bytes());
        std::fs::write(dir.path().join("id.bin"), &bin).unwrap();
        let mut mrk = Vec::new();
        write_mark(&mut mrk, 0, 0);
        write_mark(&mut mrk, bin.len() as u64, 0);
        std::fs::write(dir.path().join("id.mrk"), &mrk).unwrap();

        let mut idx = Vec::new();
        idx.extend_from_slice(&1u64.to_le_bytes());
        idx.extend_from_slice(&2u64.to_le_bytes());
        std::fs::write(dir.path().join("primary.idx"), &idx).unwrap();

        let column = ColumnType {
            name: "id".to_string(),
            kind: ColumnKind::Plain,
            element_type: PrimitiveType::UInt64,
        };
        let request = CheckRequest {
            granularity,
            mark_ext: MarkFileExtension::Legacy,
            require_checksums: false,
            pk_types: vec![PrimitiveType::UInt64],
            indices: Vec::new(),
        };
        let cancel = AtomicBool::new(false);
        let result = check_part(dir.path(), &[column], &request, &cancel).unwrap();
        assert!(result.get("primary.idx").is_some());
    }
}
