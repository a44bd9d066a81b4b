// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Parser for `columns.txt`: the part's `(name, type)` column list.
//!
//! Typed binary deserializers are out of scope, but the text format naming
//! a column's type is this crate's own concern, not a black box — the
//! checker has to know which substream layout ([`ColumnKind`]) a type
//! implies. The grammar here is small on purpose:
//!
//! ```text
//! columns format version: 1
//! 2 columns:
//! id UInt64
//! name Nullable(UInt64)
//! ```

use partcheck_domain::value_objects::{ColumnKind, ColumnType, PrimitiveType};
use partcheck_domain::CheckError;

pub fn parse(text: &str) -> Result<Vec<ColumnType>, CheckError> {
    let mut lines = text.lines();

    let header = lines
        .next()
        .ok_or_else(|| CheckError::parse("columns.txt", "empty file"))?;
    if !header.starts_with("columns format version:") {
        return Err(CheckError::parse("columns.txt", "missing format version header"));
    }

    let count_line = lines
        .next()
        .ok_or_else(|| CheckError::parse("columns.txt", "missing column count"))?;
    let count: usize = count_line
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| CheckError::parse("columns.txt", format!("bad column count line `{count_line}`")))?;

    let mut columns = Vec::with_capacity(count);
    for _ in 0..count {
        let line = lines
            .next()
            .ok_or_else(|| CheckError::parse("columns.txt", "fewer column lines than declared"))?;
        columns.push(parse_column_line(line)?);
    }

    if lines.next().is_some() {
        return Err(CheckError::parse("columns.txt", "trailing content after declared column count"));
    }

    Ok(columns)
}

fn parse_column_line(line: &str) -> Result<ColumnType, CheckError> {
    let mut parts = line.splitn(2, char::is_whitespace);
    let name = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CheckError::parse("columns.txt", format!("missing column name in `{line}`")))?
        .to_string();
    let type_spec = parts
        .next()
        .map(str::trim)
        .ok_or_else(|| CheckError::parse("columns.txt", format!("missing type for column `{name}`")))?;

    let (kind, element_type) = parse_type(type_spec)?;
    Ok(ColumnType { name, kind, element_type })
}

fn parse_type(spec: &str) -> Result<(ColumnKind, PrimitiveType), CheckError> {
    if let Some(inner) = strip_wrapper(spec, "Nullable") {
        return Ok((ColumnKind::Nullable, PrimitiveType::parse(inner)?));
    }
    if let Some(inner) = strip_wrapper(spec, "Array") {
        return Ok((ColumnKind::Array, PrimitiveType::parse(inner)?));
    }
    if let Some(inner) = strip_wrapper(spec, "LowCardinality") {
        return Ok((ColumnKind::LowCardinality, PrimitiveType::parse(inner)?));
    }
    Ok((ColumnKind::Plain, PrimitiveType::parse(spec)?))
}

fn strip_wrapper<'a>(spec: &'a str, wrapper: &str) -> Option<&'a str> {
    let prefix = format!("{wrapper}(");
    spec.strip_prefix(&prefix)?.strip_suffix(')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_wrapped_types() {
        let text = "columns format version: 1\n3 columns:\nid UInt64\nflag Nullable(UInt8)\ntags Array(UInt32)\n";
        let columns = parse(text).unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].kind, ColumnKind::Plain);
        assert_eq!(columns[1].kind, ColumnKind::Nullable);
        assert_eq!(columns[2].kind, ColumnKind::Array);
    }

    #[test]
    fn rejects_wrong_declared_count() {
        let text = "columns format version: 1\n2 columns:\nid UInt64\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn rejects_missing_header() {
        assert!(parse("id UInt64\n").is_err());
    }
}
