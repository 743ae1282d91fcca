use prometheus_client::{
    metrics::{counter::Counter, gauge::Gauge},
    registry::Registry,
};

/// Counters and gauges maintained by a [`Simulator`](crate::Simulator).
#[derive(Default, Debug)]
pub struct Metrics {
    /// Number of ticks executed, warmup included.
    pub ticks: Counter,
    /// Number of packets created by endpoints and services.
    pub packets_generated: Counter,
    /// Number of packets consumed by endpoints.
    pub packets_delivered: Counter,
    /// Number of packets sent back by services.
    pub packets_echoed: Counter,
    /// Number of packets dropped for waiting too long.
    pub packets_expired: Counter,
    /// Number of new packets dropped for lack of room.
    pub packets_discarded: Counter,
    /// Number of elements broken by failure injection.
    pub failures: Counter,
    /// Number of elements currently broken.
    pub broken: Gauge,
    /// Number of elements currently disabled.
    pub disabled: Gauge,
}

impl Metrics {
    /// Register the metrics in the provided registry.
    pub fn register(&self, registry: &mut Registry) {
        registry.register("ticks", "Number of ticks executed", self.ticks.clone());
        registry.register(
            "packets_generated",
            "Number of packets created by endpoints and services",
            self.packets_generated.clone(),
        );
        registry.register(
            "packets_delivered",
            "Number of packets consumed by endpoints",
            self.packets_delivered.clone(),
        );
        registry.register(
            "packets_echoed",
            "Number of packets sent back by services",
            self.packets_echoed.clone(),
        );
        registry.register(
            "packets_expired",
            "Number of packets dropped for waiting too long",
            self.packets_expired.clone(),
        );
        registry.register(
            "packets_discarded",
            "Number of new packets dropped for lack of room",
            self.packets_discarded.clone(),
        );
        registry.register(
            "failures",
            "Number of elements broken at random",
            self.failures.clone(),
        );
        registry.register(
            "broken",
            "Number of elements currently broken",
            self.broken.clone(),
        );
        registry.register(
            "disabled",
            "Number of elements currently disabled",
            self.disabled.clone(),
        );
    }
}
