// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Metrics Module
//!
//! Process-local Prometheus metrics for the checker binary: an in-flight
//! gauge tracking concurrently running `check()` calls, and a counter for
//! completed checks by verdict. A short-lived CLI invocation has no
//! scrape target of its own, so these are dumped to stdout on exit via
//! `--metrics` rather than served over HTTP.

pub mod check_metrics;

pub use check_metrics::CheckMetrics;
