// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Column type descriptors: the substream layout a column's on-disk type
//! determines, and the primitive element types used both by columns and by
//! primary-key tuples in `primary.idx`.
//!
//! Real column serialization (how array sizes, null masks, and dictionary
//! codes are actually packed) is one of the black-box "typed binary
//! deserializers" the specification puts out of scope. What this module
//! models is only what the checker needs: which substream files exist for a
//! given column type, what suffix each contributes to the substream file
//! name, and a fixed width in bytes per row so the checker can advance the
//! decompressed stream the same way a real deserializer would for it. The
//! one genuinely variable-width case — low cardinality dictionaries — is
//! represented structurally (two substreams, one of them exempt from mark
//! position checks) without byte-level fidelity, since its rows are never
//! position-checked anyway.

use crate::error::CheckError;

/// Primitive element type, used both as a column's scalar type and as one
/// component of a primary-key tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
}

impl PrimitiveType {
    pub fn fixed_width(self) -> u64 {
        match self {
            PrimitiveType::UInt8 | PrimitiveType::Int8 => 1,
            PrimitiveType::UInt16 | PrimitiveType::Int16 => 2,
            PrimitiveType::UInt32 | PrimitiveType::Int32 | PrimitiveType::Float32 => 4,
            PrimitiveType::UInt64 | PrimitiveType::Int64 | PrimitiveType::Float64 => 8,
        }
    }

    pub fn parse(name: &str) -> Result<Self, CheckError> {
        match name {
            "UInt8" => Ok(PrimitiveType::UInt8),
            "UInt16" => Ok(PrimitiveType::UInt16),
            "UInt32" => Ok(PrimitiveType::UInt32),
            "UInt64" => Ok(PrimitiveType::UInt64),
            "Int8" => Ok(PrimitiveType::Int8),
            "Int16" => Ok(PrimitiveType::Int16),
            "Int32" => Ok(PrimitiveType::Int32),
            "Int64" => Ok(PrimitiveType::Int64),
            "Float32" => Ok(PrimitiveType::Float32),
            "Float64" => Ok(PrimitiveType::Float64),
            other => Err(CheckError::parse("columns.txt", format!("unknown type `{other}`"))),
        }
    }
}

/// The shape of a column's on-disk substream set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// A single substream carrying the scalar values directly.
    Plain,
    /// A null-mask substream followed by the values substream.
    Nullable,
    /// An array-sizes (offsets) substream followed by the element values
    /// substream.
    Array,
    /// A dictionary-keys substream (the unique values, read
    /// non-monotonically) and a dictionary-indexes substream (one code per
    /// row).
    LowCardinality,
}

/// One segment of a substream's path, contributing a suffix to its on-disk
/// file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstreamSegment {
    Regular,
    NullMap,
    ArraySizes,
    DictionaryKeys,
    DictionaryIndexes,
}

impl SubstreamSegment {
    fn suffix(self) -> &'static str {
        match self {
            SubstreamSegment::Regular => "",
            SubstreamSegment::NullMap => ".null",
            SubstreamSegment::ArraySizes => ".size0",
            SubstreamSegment::DictionaryKeys => ".dict",
            SubstreamSegment::DictionaryIndexes => ".idx_codes",
        }
    }

    /// Low-cardinality dictionaries are read non-monotonically, so their
    /// mark position must never be checked for equality — only that the
    /// mark file itself is consumed.
    pub fn is_dictionary_keys(self) -> bool {
        matches!(self, SubstreamSegment::DictionaryKeys)
    }
}

/// One physical `(bin, mrk)` file pair contributed by a column's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstreamPath(pub SubstreamSegment);

impl SubstreamPath {
    /// `getFileNameForStream(name, path)`: combines the column name with
    /// this substream's suffix.
    pub fn file_name(&self, column_name: &str) -> String {
        format!("{column_name}{}", self.0.suffix())
    }

    pub fn is_dictionary_keys(&self) -> bool {
        self.0.is_dictionary_keys()
    }

    /// Fixed bytes consumed per row for substreams whose width doesn't
    /// depend on cell content. `None` for the one substream whose per-row
    /// width is genuinely data-dependent — a low cardinality dictionary's
    /// unique-values payload, which is also the substream exempted from
    /// mark position checks, so nothing ever needs its width.
    pub fn fixed_row_width(&self, element_type: PrimitiveType) -> Option<u64> {
        match self.0 {
            SubstreamSegment::Regular => Some(element_type.fixed_width()),
            SubstreamSegment::NullMap => Some(1),
            SubstreamSegment::ArraySizes => Some(8),
            // One dictionary code per row, independent of the dictionary's value type.
            SubstreamSegment::DictionaryIndexes => Some(4),
            SubstreamSegment::DictionaryKeys => None,
        }
    }
}

/// A column's `(name, type)` entry from `columns.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub name: String,
    pub kind: ColumnKind,
    pub element_type: PrimitiveType,
}

impl ColumnType {
    pub fn substreams(&self) -> Vec<SubstreamPath> {
        match self.kind {
            ColumnKind::Plain => vec![SubstreamPath(SubstreamSegment::Regular)],
            ColumnKind::Nullable => vec![
                SubstreamPath(SubstreamSegment::NullMap),
                SubstreamPath(SubstreamSegment::Regular),
            ],
            ColumnKind::Array => vec![
                SubstreamPath(SubstreamSegment::ArraySizes),
                SubstreamPath(SubstreamSegment::Regular),
            ],
            ColumnKind::LowCardinality => vec![
                SubstreamPath(SubstreamSegment::DictionaryKeys),
                SubstreamPath(SubstreamSegment::DictionaryIndexes),
            ],
        }
    }

    /// The one substream in this column's layout that carries exactly one
    /// fixed-width entry per row, used to derive `actual_rows_read` for a
    /// mark. Every other substream either mirrors this count (`Regular` for
    /// a `Plain` column) or is data-dependent and deliberately not used for
    /// counting (array element values, dictionary keys).
    pub fn row_counting_substream(&self) -> SubstreamPath {
        let segment = match self.kind {
            ColumnKind::Plain => SubstreamSegment::Regular,
            ColumnKind::Nullable => SubstreamSegment::NullMap,
            ColumnKind::Array => SubstreamSegment::ArraySizes,
            ColumnKind::LowCardinality => SubstreamSegment::DictionaryIndexes,
        };
        SubstreamPath(segment)
    }
}

/// A secondary (skip) index's identity within the part: `I.file_name` names
/// its `.idx`/mark file pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub file_name: String,
    /// Fixed width of one serialized index granule, in bytes. Real
    /// granules (bloom filters, min-max sets, ...) are black-box
    /// deserializers; this crate only needs to advance past them.
    pub granule_width: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_column_has_one_substream() {
        let c = ColumnType {
            name: "x".into(),
            kind: ColumnKind::Plain,
            element_type: PrimitiveType::UInt64,
        };
        let subs = c.substreams();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].file_name("x"), "x");
        assert_eq!(subs[0].fixed_row_width(PrimitiveType::UInt64), Some(8));
    }

    #[test]
    fn low_cardinality_dictionary_keys_is_exempt_from_mark_position_checks() {
        let c = ColumnType {
            name: "x".into(),
            kind: ColumnKind::LowCardinality,
            element_type: PrimitiveType::UInt32,
        };
        let subs = c.substreams();
        assert!(subs[0].is_dictionary_keys());
        assert!(!subs[1].is_dictionary_keys());
        assert_eq!(subs[0].file_name("x"), "x.dict");
    }
}
