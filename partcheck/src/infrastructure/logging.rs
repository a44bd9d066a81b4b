// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Logging
//!
//! Structured logging for the checker binary, built on `tracing` with
//! `tracing-subscriber`'s `fmt` layer. Call sites throughout `infrastructure`
//! and `application` emit `tracing::{info,warn,debug,error}` events directly
//! rather than going through an indirection layer; this module only owns
//! process-wide subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber. `verbose` raises the default
/// level from `info` to `debug`; `RUST_LOG` always takes precedence when set.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
