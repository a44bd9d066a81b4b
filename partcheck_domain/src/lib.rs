// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Layer
//!
//! Pure types and algorithms for two pieces of a columnar storage engine's
//! query-execution internals:
//!
//! - The **Resize** dataflow operator ([`services::StatelessResize`],
//!   [`services::EventDrivenResize`]), which multiplexes chunks between an
//!   arbitrary number of input and output ports without inspecting them.
//! - The **DataPart checker** ([`services::PartChecker`]), which validates
//!   that an on-disk data part's compressed columns, marks, primary index,
//!   and checksums are mutually consistent.
//!
//! Everything in this crate is synchronous and has no knowledge of the
//! filesystem, threads, or wall-clock time — those concerns belong to the
//! `partcheck` application crate, which implements the ports this crate
//! defines ([`entities::InputPort`], [`entities::OutputPort`],
//! [`services::PartChecker`]).
//!
//! ## Architecture Position
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              DOMAIN (this crate)             │
//! │  - Resize scheduling algorithms              │
//! │  - PartChecker port + value objects          │
//! │  - No I/O, no async runtime                  │
//! └─────────────────────────────────────────────┘
//!                      ▲
//!                      │ implements the ports
//! ┌─────────────────────────────────────────────┐
//! │         APPLICATION (`partcheck` crate)      │
//! │  - Filesystem-backed PartChecker             │
//! │  - Channel-backed Resize ports               │
//! └─────────────────────────────────────────────┘
//! ```

pub mod entities;
pub mod error;
pub mod services;
pub mod value_objects;

pub use error::CheckError;
pub use services::{
    CancellationToken, CheckRequest, EventDrivenResize, MarkFileExtension, PartChecker, StatelessResize,
    Verdict,
};
