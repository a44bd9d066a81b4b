// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Low-level file-format adapters: the compressed block codec, the
//! `(bin, mrk)` stream reader, the `columns.txt` parser, and the
//! `resize-sim` scripted-event format.

pub mod columns_txt;
pub mod compressed_block;
pub mod resize_script;
pub mod stream;
