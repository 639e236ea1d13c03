//! # Metrics
//!
//! Prometheus counters for the gatekeeping layer: admission outcomes and
//! gate redirects. Exposed in OpenMetrics text form at `/metrics`.

use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

pub struct Metrics {
    registry: Registry,
    pub comments_admitted: Counter,
    pub comments_rejected: Counter,
    pub rate_limited: Counter,
    pub gate_redirects: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let comments_admitted = Counter::default();
        registry.register(
            "comments_admitted",
            "Comments accepted by the admission pipeline",
            comments_admitted.clone(),
        );

        let comments_rejected = Counter::default();
        registry.register(
            "comments_rejected",
            "Comment submissions rejected by validation or target checks",
            comments_rejected.clone(),
        );

        let rate_limited = Counter::default();
        registry.register(
            "rate_limited_requests",
            "Requests denied by a rate-limit policy",
            rate_limited.clone(),
        );

        let gate_redirects = Counter::default();
        registry.register(
            "gate_redirects",
            "Requests redirected by the authorization gate",
            gate_redirects.clone(),
        );

        Self {
            registry,
            comments_admitted,
            comments_rejected,
            rate_limited,
            gate_redirects,
        }
    }

    /// Renders the registry in OpenMetrics text format.
    pub fn render(&self) -> String {
        let mut buf = String::new();
        // Encoding into a String only fails on formatter errors, which the
        // text encoder does not produce.
        let _ = encode(&mut buf, &self.registry);
        buf
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_rendered_output() {
        let metrics = Metrics::new();
        metrics.comments_admitted.inc();
        metrics.gate_redirects.inc();

        let body = metrics.render();
        assert!(body.contains("comments_admitted_total 1"));
        assert!(body.contains("gate_redirects_total 1"));
        assert!(body.contains("comments_rejected_total 0"));
    }
}
