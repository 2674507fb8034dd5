use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all dashboard metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
///
/// If a global recorder is already installed (e.g. several test apps in one
/// process) a detached recorder's handle is returned instead.
pub fn init_metrics() -> PrometheusHandle {
    let handle = match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            tracing::debug!(error = %e, "Metrics recorder already installed");
            return PrometheusBuilder::new().build_recorder().handle();
        }
    };

    // Pre-register counters so they appear even before the first increment.
    counter!("polls_total").absolute(0);
    counter!("polls_failed_total").absolute(0);
    counter!("stale_snapshots_discarded_total").absolute(0);
    counter!("commands_total").absolute(0);
    counter!("commands_failed_total").absolute(0);
    counter!("saves_total").absolute(0);
    counter!("saves_failed_total").absolute(0);

    gauge!("bot_running").set(0.0);

    handle
}
