// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Infrastructure Configuration
//!
//! Process-wide configuration for the checker binary: the default mark
//! file extension, index granularity fallback, and logging/metrics knobs,
//! loadable from a TOML file, environment variables, or CLI overrides.
//!
//! Layering follows the `config` crate's usual precedence: defaults, then
//! an optional file, then `PARTCHECK_*` environment variables, each layer
//! able to override the one before it.

pub mod part_check_config;

pub use part_check_config::PartCheckConfig;
