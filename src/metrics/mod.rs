use lazy_static::lazy_static;
use prometheus::IntCounter;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;

lazy_static! {
    pub static ref PUSH_RECEIVED_METRIC: IntCounter = IntCounter::new(
        "push_received_total",
        "Number of inbound push notifications dispatched"
    )
    .expect("metric can not be created");

    pub static ref TOKEN_REFRESH_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "push_token_refresh_total",
            "External token refreshes, labeled by whether they were applied"
        ),
        &["outcome"]
    )
    .expect("metric can not be created");

    pub static ref DELEGATE_FAILURES_METRIC: IntCounterVec = IntCounterVec::new(
        Opts::new(
            "push_delegate_failures_total",
            "Delegate invocation failures, labeled by delegate name"
        ),
        &["delegate"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

/// Registers the crate's collectors with [`struct@REGISTRY`]. The host decides
/// whether and how to expose them; calling this twice is an error.
pub fn register_custom_metrics() {
    REGISTRY
        .register(Box::new(PUSH_RECEIVED_METRIC.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(TOKEN_REFRESH_METRIC.clone()))
        .expect("collector can be registered");
    REGISTRY
        .register(Box::new(DELEGATE_FAILURES_METRIC.clone()))
        .expect("collector can be registered");
}

#[cfg(test)]
mod metrics_test {
    use super::*;

    #[test]
    fn test_register_custom_metrics() {
        register_custom_metrics();
        PUSH_RECEIVED_METRIC.inc();
        TOKEN_REFRESH_METRIC.with_label_values(&["applied"]).inc();
        DELEGATE_FAILURES_METRIC.with_label_values(&["d1"]).inc();
        assert!(!REGISTRY.gather().is_empty());
    }
}
