// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # partcheck
//!
//! Dataflow Resize operator and on-disk DataPart integrity checker for a
//! columnar analytic store, following Clean Architecture / Domain-Driven
//! Design layering.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Application Layer                          │
//! │  (Use Cases, Commands)                                      │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Domain Layer                             │
//! │  (Resize, PartChecker, Value Objects — partcheck-domain)     │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Infrastructure Layer                         │
//! │  (Stream/mark reading, filesystem PartChecker, channels)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Concepts
//!
//! ### Resize
//! A dataflow operator multiplexing an arbitrary number of input ports onto
//! an arbitrary number of output ports without inspecting the chunks that
//! pass through it. Two scheduling variants are provided by
//! `partcheck_domain::services`: a stateless round-robin scan and an
//! event-driven variant tracking per-port status between calls.
//!
//! ### DataPart checking
//! Validates that an on-disk data part's compressed columns, marks, primary
//! index, secondary indices, and optional checksum sidecar are mutually
//! consistent, returning the checksums of every file read.

pub mod application;
pub mod infrastructure;
pub mod presentation;

// Tests are organized as:
// - Unit tests: #[cfg(test)] modules within each source file
// - Integration tests: separate files in tests/ directory

pub use partcheck_domain::{
    CancellationToken, CheckError, CheckRequest, EventDrivenResize, MarkFileExtension, PartChecker,
    StatelessResize, Verdict,
};
