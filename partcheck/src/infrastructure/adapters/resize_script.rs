// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Parser for the tiny scripted-event format `resize-sim` drives a Resize
//! operator with: one command per line, blank lines and `#` comments
//! ignored.
//!
//! ```text
//! fill 0 hello
//! finish 0
//! prepare
//! drain 0
//! ```

use partcheck_domain::CheckError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    /// Queues a chunk of `data` on input port `index`.
    Fill { index: usize, data: Vec<u8> },
    /// Marks input port `index` as having no more chunks upstream.
    Finish { index: usize },
    /// Drains and reports whatever is waiting on output port `index`.
    Drain { index: usize },
    /// Runs one scheduling pass.
    Prepare,
}

pub fn parse(text: &str) -> Result<Vec<ScriptEvent>, CheckError> {
    let mut events = Vec::new();
    for (line_no, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        events.push(parse_line(line).map_err(|reason| {
            CheckError::parse("resize script", format!("line {}: {reason}", line_no + 1))
        })?);
    }
    Ok(events)
}

fn parse_line(line: &str) -> Result<ScriptEvent, String> {
    let mut parts = line.splitn(3, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    match command {
        "prepare" => Ok(ScriptEvent::Prepare),
        "fill" => {
            let index = parse_index(parts.next())?;
            let data = parts.next().unwrap_or_default().as_bytes().to_vec();
            Ok(ScriptEvent::Fill { index, data })
        }
        "finish" => Ok(ScriptEvent::Finish { index: parse_index(parts.next())? }),
        "drain" => Ok(ScriptEvent::Drain { index: parse_index(parts.next())? }),
        other => Err(format!("unknown command `{other}`")),
    }
}

fn parse_index(field: Option<&str>) -> Result<usize, String> {
    field
        .ok_or_else(|| "missing port index".to_string())?
        .parse()
        .map_err(|_| format!("`{}` is not a port index", field.unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_script() {
        let text = "# comment\nfill 0 hello\nprepare\ndrain 0\nfinish 0\n";
        let events = parse(text).unwrap();
        assert_eq!(
            events,
            vec![
                ScriptEvent::Fill { index: 0, data: b"hello".to_vec() },
                ScriptEvent::Prepare,
                ScriptEvent::Drain { index: 0 },
                ScriptEvent::Finish { index: 0 },
            ]
        );
    }

    #[test]
    fn rejects_unknown_command() {
        assert!(parse("frobnicate 0").is_err());
    }

    #[test]
    fn rejects_missing_index() {
        assert!(parse("fill").is_err());
    }
}
