// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Human-readable rendering of a completed or cancelled part check.

use crate::application::commands::CheckPartResult;
use std::fmt::Write as _;

pub fn render_text(part_path: &str, result: &CheckPartResult) -> String {
    let mut out = String::new();
    if result.cancelled {
        let _ = writeln!(out, "{part_path}: check cancelled");
        return out;
    }

    let _ = writeln!(out, "{part_path}: OK ({} files checked)", result.checksums.len());
    for (name, checksum) in result.checksums.iter() {
        match &checksum.uncompressed {
            Some((rows, hash)) => {
                let _ = writeln!(
                    out,
                    "  {name}: {} bytes, sha256 {}  (uncompressed {rows} bytes, sha256 {hash})",
                    checksum.size, checksum.hash
                );
            }
            None => {
                let _ = writeln!(out, "  {name}: {} bytes, sha256 {}", checksum.size, checksum.hash);
            }
        }
    }
    out
}
