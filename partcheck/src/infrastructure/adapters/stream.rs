// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `Stream`: one physical `(bin, mrk)` file pair, read forward exactly once,
//! with the mark-validation protocol the checker runs against it.
//!
//! This is the single most delicate piece of the checker. A stream tracks
//! three logically parallel positions — the raw compressed bytes read, the
//! decompressed bytes actually consumed, and the mark records read — and
//! reconciles them at every granule boundary. The subtlety is entirely in
//! [`Stream::assert_mark`]: compressed block boundaries are not uniquely
//! addressable (the end of one block and the start of the next are the same
//! byte position), so a mark written against either interpretation must be
//! accepted.

use super::compressed_block;
use partcheck_domain::value_objects::{Checksums, FileChecksum, IndexGranularity, MarkInCompressedFile, MarkRecord};
use partcheck_domain::CheckError;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

pub struct Stream {
    base_name: String,
    bin_extension: String,
    mrk_extension: String,
    bin_path: PathBuf,
    mrk_path: PathBuf,

    bin_reader: BufReader<File>,
    mrk_reader: BufReader<File>,
    mrk_file_len: u64,

    compressed_hasher: Sha256,
    uncompressed_hasher: Sha256,
    mrk_hasher: Sha256,

    compressed_count: u64,
    uncompressed_count: u64,
    mrk_count: u64,

    current_block: Vec<u8>,
    current_block_raw_len: u64,
    block_pos: usize,
    bin_eof: bool,

    mark_position: u64,
}

impl Stream {
    /// Opens `{path}/{base_name}{bin_extension}` and its companion mark
    /// file `{path}/{base_name}{mrk_extension}`.
    pub fn open(path: &Path, base_name: &str, bin_extension: &str, mrk_extension: &str) -> Result<Self, CheckError> {
        let bin_path = path.join(format!("{base_name}{bin_extension}"));
        let mrk_path = path.join(format!("{base_name}{mrk_extension}"));

        let bin_file = File::open(&bin_path)?;
        let mrk_file = File::open(&mrk_path)?;
        let mrk_file_len = mrk_file.metadata()?.len();

        Ok(Self {
            base_name: base_name.to_string(),
            bin_extension: bin_extension.to_string(),
            mrk_extension: mrk_extension.to_string(),
            bin_path,
            mrk_path,
            bin_reader: BufReader::new(bin_file),
            mrk_reader: BufReader::new(mrk_file),
            mrk_file_len,
            compressed_hasher: Sha256::new(),
            uncompressed_hasher: Sha256::new(),
            mrk_hasher: Sha256::new(),
            compressed_count: 0,
            uncompressed_count: 0,
            mrk_count: 0,
            current_block: Vec::new(),
            current_block_raw_len: 0,
            block_pos: 0,
            bin_eof: false,
            mark_position: 0,
        })
    }

    pub fn mrk_path_display(&self) -> String {
        self.mrk_path.display().to_string()
    }

    pub fn bin_path_display(&self) -> String {
        self.bin_path.display().to_string()
    }

    /// Whether the mark file has no more bytes to read.
    pub fn mrk_is_eof(&self) -> bool {
        self.mrk_count >= self.mrk_file_len
    }

    fn has_pending_data(&self) -> bool {
        self.block_pos < self.current_block.len()
    }

    /// Loads the next block from disk if the current one is fully
    /// consumed and the stream hasn't already hit EOF. A no-op otherwise.
    fn ensure_loaded(&mut self) -> Result<(), CheckError> {
        if self.has_pending_data() || self.bin_eof {
            return Ok(());
        }
        match compressed_block::read_block(&mut self.bin_reader)? {
            Some(block) => {
                self.compressed_hasher.update(&block.raw);
                self.compressed_count += block.raw.len() as u64;
                self.current_block_raw_len = block.raw.len() as u64;
                self.current_block = block.decompressed;
                self.block_pos = 0;
            }
            None => {
                self.bin_eof = true;
            }
        }
        Ok(())
    }

    /// True once the decompressed stream is fully consumed and no further
    /// block is available.
    pub fn uncompressed_is_eof(&mut self) -> Result<bool, CheckError> {
        self.ensure_loaded()?;
        Ok(!self.has_pending_data() && self.bin_eof)
    }

    /// Consumes up to `len` decompressed bytes, crossing block boundaries
    /// as needed. Returns fewer than `len` bytes only at end of stream.
    pub fn consume(&mut self, len: u64) -> Result<Vec<u8>, CheckError> {
        let mut out = Vec::with_capacity(len as usize);
        while (out.len() as u64) < len {
            self.ensure_loaded()?;
            if !self.has_pending_data() {
                break;
            }
            let remaining = len - out.len() as u64;
            let available = (self.current_block.len() - self.block_pos) as u64;
            let take = remaining.min(available) as usize;
            let taken = &self.current_block[self.block_pos..self.block_pos + take];
            self.uncompressed_hasher.update(taken);
            out.extend_from_slice(taken);
            self.block_pos += take;
            self.uncompressed_count += take as u64;
        }
        Ok(out)
    }

    /// Consumes every remaining decompressed byte without bounding by a
    /// requested length. Used for the one substream this checker never
    /// position-checks (a low cardinality dictionary's keys) where there is
    /// no fixed row width to advance by.
    pub fn consume_all(&mut self) -> Result<u64, CheckError> {
        let mut total = 0u64;
        loop {
            self.ensure_loaded()?;
            if !self.has_pending_data() {
                break;
            }
            let taken = &self.current_block[self.block_pos..];
            self.uncompressed_hasher.update(taken);
            total += taken.len() as u64;
            self.uncompressed_count += taken.len() as u64;
            self.block_pos = self.current_block.len();
        }
        Ok(total)
    }

    /// Reads every remaining byte of the mark file straight through,
    /// without parsing individual records or checking position. Paired with
    /// [`Stream::consume_all`] for substreams exempt from mark validation.
    pub fn drain_marks(&mut self) -> Result<(), CheckError> {
        let remaining = self.mrk_file_len.saturating_sub(self.mrk_count);
        if remaining == 0 {
            return Ok(());
        }
        let mut buf = vec![0u8; remaining as usize];
        self.mrk_reader.read_exact(&mut buf)?;
        self.mrk_hasher.update(&buf);
        self.mrk_count += buf.len() as u64;
        Ok(())
    }

    fn read_mark_record(&mut self, extended: bool) -> Result<MarkRecord, CheckError> {
        let len = MarkRecord::record_len(extended) as usize;
        let mut buf = vec![0u8; len];
        self.mrk_reader.read_exact(&mut buf).map_err(|e| {
            CheckError::corrupted(format!("unexpected end of {} file: {e}", self.mrk_path.display()))
        })?;
        self.mrk_hasher.update(&buf);
        self.mrk_count += buf.len() as u64;

        let offset_in_compressed_file = u64::from_le_bytes(buf[0..8].try_into().unwrap());
        let offset_in_decompressed_block = u64::from_le_bytes(buf[8..16].try_into().unwrap());
        let mark = MarkInCompressedFile::new(offset_in_compressed_file, offset_in_decompressed_block);

        if extended {
            let rows = u64::from_le_bytes(buf[16..24].try_into().unwrap());
            Ok(MarkRecord::Extended { mark, rows })
        } else {
            Ok(MarkRecord::Legacy(mark))
        }
    }

    fn current_data_mark(&self) -> MarkInCompressedFile {
        MarkInCompressedFile::new(
            self.compressed_count - self.current_block_raw_len,
            self.block_pos as u64,
        )
    }

    /// The core mark-validation protocol. `only_read` is true for
    /// low-cardinality dictionary-keys substreams, which are read
    /// non-monotonically and must not be checked for position equality.
    pub fn assert_mark(
        &mut self,
        only_read: bool,
        extended: bool,
        granularity: &IndexGranularity,
    ) -> Result<(), CheckError> {
        let mrk_record = self.read_mark_record(extended)?;
        let mrk_mark = mrk_record.mark();

        if !self.has_pending_data() {
            // Sitting exactly on a block boundary: the alternative mark
            // addresses the same byte position that "end of the block just
            // finished" and "start of the next block" both describe, so
            // either form must be accepted before forcing a refill.
            let alternative = MarkInCompressedFile::new(
                self.compressed_count.saturating_sub(self.current_block_raw_len),
                0,
            );
            if mrk_mark == alternative {
                self.mark_position += 1;
                return Ok(());
            }

            self.ensure_loaded()?;
            if !self.has_pending_data() && self.bin_eof {
                // At true EOF the block-boundary arithmetic no longer
                // identifies a meaningful position; the final mark is not
                // checked.
                self.mark_position += 1;
                return Ok(());
            }
        }

        let data_mark = self.current_data_mark();

        if !only_read {
            let expected_rows = granularity.mark_rows(self.mark_position as usize)?;
            let mrk_rows = mrk_record.rows().unwrap_or(expected_rows);
            if mrk_mark != data_mark || mrk_rows != expected_rows {
                return Err(CheckError::IncorrectMark {
                    computed: data_mark,
                    stored: mrk_mark,
                    mark_file: self.mrk_path.display().to_string(),
                    mark_number: self.mark_position,
                });
            }
        }

        self.mark_position += 1;
        Ok(())
    }

    pub fn assert_end(&mut self, granularity: &IndexGranularity) -> Result<(), CheckError> {
        if !self.uncompressed_is_eof()? {
            return Err(CheckError::corrupted(format!(
                "EOF expected in {} at position {} (compressed), {} (uncompressed)",
                self.bin_path.display(),
                self.compressed_count,
                self.uncompressed_count
            )));
        }

        if granularity.has_final_mark() {
            let extended = self.mrk_extension.ends_with("2");
            let rec = self.read_mark_record(extended)?;
            let expected_rows = granularity.mark_rows(self.mark_position as usize)?;
            let rows = rec.rows().unwrap_or(expected_rows);
            if rows != 0 {
                return Err(CheckError::corrupted(format!(
                    "incorrect final mark at the end of {}: expected 0 rows, got {rows}",
                    self.mrk_path.display()
                )));
            }
        }

        if !self.mrk_is_eof() {
            return Err(CheckError::corrupted(format!(
                "EOF expected in {} file at position {}",
                self.mrk_path.display(),
                self.mrk_count
            )));
        }

        Ok(())
    }

    pub fn save_checksums(&self, checksums: &mut Checksums) {
        checksums.insert(
            format!("{}{}", self.base_name, self.bin_extension),
            FileChecksum::with_uncompressed(
                self.compressed_count,
                hex::encode(self.compressed_hasher.clone().finalize()),
                self.uncompressed_count,
                hex::encode(self.uncompressed_hasher.clone().finalize()),
            ),
        );
        checksums.insert(
            format!("{}{}", self.base_name, self.mrk_extension),
            FileChecksum::compressed_only(self.mrk_count, hex::encode(self.mrk_hasher.clone().finalize())),
        );
    }
}
