// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Metrics for the checker binary, registered against a private
//! [`prometheus::Registry`] rather than the process-wide default so tests
//! constructing multiple [`CheckMetrics`] instances don't collide.

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

pub struct CheckMetrics {
    registry: Registry,
    pub checks_in_flight: IntGauge,
    pub checks_completed: IntCounterVec,
}

impl CheckMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let checks_in_flight = IntGauge::new("partcheck_checks_in_flight", "Part checks currently running")?;
        registry.register(Box::new(checks_in_flight.clone()))?;

        let checks_completed = IntCounterVec::new(
            Opts::new("partcheck_checks_completed_total", "Completed part checks by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(checks_completed.clone()))?;

        Ok(Self {
            registry,
            checks_in_flight,
            checks_completed,
        })
    }

    /// Renders all registered metrics in Prometheus text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
