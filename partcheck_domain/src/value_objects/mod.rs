// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Value objects shared by the Resize operator and the DataPart checker.

mod checksums;
mod chunk;
mod column;
mod index_granularity;
mod mark;

pub use checksums::{Checksums, FileChecksum};
pub use chunk::Chunk;
pub use column::{ColumnKind, ColumnType, IndexSpec, PrimitiveType, SubstreamPath, SubstreamSegment};
pub use index_granularity::IndexGranularity;
pub use mark::{MarkInCompressedFile, MarkRecord};
