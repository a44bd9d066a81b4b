// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Presentation Layer
//!
//! Formats a [`crate::application::commands::CheckPartResult`] or
//! [`crate::application::commands::ResizeSimResult`] for display. CLI
//! argument parsing itself lives directly in the `partcheck` binary's
//! `main.rs`: a part path plus a handful of validation knobs, and a pair of
//! resize-sim flags, is too small a surface to warrant its own parsing
//! module.

pub mod report;
pub mod resize_trace;

pub use report::render_text;
pub use resize_trace::render_trace;
