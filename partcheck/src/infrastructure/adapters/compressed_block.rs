// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The compressed-block framing a `.bin`/`.idx` file is made of.
//!
//! Real column files are framed as a sequence of independently compressed
//! blocks, each prefixed by a small header naming the codec and the
//! compressed/decompressed sizes. Which codec compresses the payload is
//! exactly the kind of thing this system treats as a black box — what
//! matters to the checker is the framing itself, since mark validation
//! reasons about block *boundaries*, not block contents. This module
//! implements the framing with a single codec, `None` (store), which is
//! sufficient to produce genuine block boundaries for the mark-tolerance
//! logic in [`super::stream::Stream`] to exercise.

use partcheck_domain::CheckError;
use std::io::Read;

/// Byte length of the block header: one codec-method byte, then two
/// little-endian `u32` size fields.
pub const HEADER_LEN: u64 = 9;

pub const CODEC_NONE: u8 = 0;

/// One decoded block read from a compressed file, plus its on-disk length
/// (header included) so the caller can track file-offset bookkeeping.
pub struct RawBlock {
    pub decompressed: Vec<u8>,
    /// Header + payload bytes exactly as they appeared on disk, for feeding
    /// a running hash of the compressed file's raw content.
    pub raw: Vec<u8>,
}

/// Reads one block from `reader`. Returns `Ok(None)` only on a clean EOF —
/// zero bytes available where a header was expected. Any other short read
/// is corruption.
pub fn read_block<R: Read>(reader: &mut R) -> Result<Option<RawBlock>, CheckError> {
    let mut header = [0u8; HEADER_LEN as usize];
    let mut filled = 0usize;
    while filled < header.len() {
        let n = reader.read(&mut header[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(CheckError::corrupted("truncated block header"));
        }
        filled += n;
    }

    let method = header[0];
    let compressed_size = u32::from_le_bytes(header[1..5].try_into().unwrap()) as usize;
    let uncompressed_size = u32::from_le_bytes(header[5..9].try_into().unwrap()) as usize;

    let mut payload = vec![0u8; compressed_size];
    reader.read_exact(&mut payload)?;

    let decompressed = match method {
        CODEC_NONE => payload.clone(),
        other => return Err(CheckError::corrupted(format!("unknown block codec {other}"))),
    };

    if decompressed.len() != uncompressed_size {
        return Err(CheckError::corrupted("block header uncompressed size mismatch"));
    }

    let mut raw = Vec::with_capacity(header.len() + payload.len());
    raw.extend_from_slice(&header);
    raw.extend_from_slice(&payload);

    Ok(Some(RawBlock { decompressed, raw }))
}

/// Appends one `None`-codec block carrying `data` to `out`. Used by test
/// fixtures and by anything producing parts for this checker to validate.
pub fn write_block(out: &mut Vec<u8>, data: &[u8]) {
    out.push(CODEC_NONE);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
}
