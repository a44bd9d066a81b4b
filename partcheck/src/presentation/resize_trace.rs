// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Human-readable rendering of a [`ResizeSimResult`] trace.

use crate::application::commands::{ResizeSimResult, ResizeSimStep};
use std::fmt::Write as _;

pub fn render_trace(result: &ResizeSimResult) -> String {
    let mut out = String::new();
    for step in &result.steps {
        match step {
            ResizeSimStep::Filled { index, bytes } => {
                let _ = writeln!(out, "fill   input[{index}]  {bytes} bytes queued");
            }
            ResizeSimStep::Finished { index } => {
                let _ = writeln!(out, "finish input[{index}]");
            }
            ResizeSimStep::Prepared { verdict } => {
                let _ = writeln!(out, "prepare -> {verdict:?}");
            }
            ResizeSimStep::Drained { index, chunk: Some(bytes) } => {
                let _ = writeln!(
                    out,
                    "drain  output[{index}] -> {:?}",
                    String::from_utf8_lossy(bytes)
                );
            }
            ResizeSimStep::Drained { index, chunk: None } => {
                let _ = writeln!(out, "drain  output[{index}] -> (empty)");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use partcheck_domain::Verdict;

    #[test]
    fn renders_one_line_per_step() {
        let result = ResizeSimResult {
            steps: vec![
                ResizeSimStep::Filled { index: 0, bytes: 5 },
                ResizeSimStep::Prepared { verdict: Verdict::NeedData },
                ResizeSimStep::Drained { index: 0, chunk: Some(b"hello".to_vec()) },
            ],
        };
        let rendered = render_trace(&result);
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains("NeedData"));
        assert!(rendered.contains("hello"));
    }
}
