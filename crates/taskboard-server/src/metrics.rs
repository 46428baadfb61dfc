//! Prometheus metrics recorder and metric names.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the handle used to render `/metrics`. Call once at startup,
/// before any metric is recorded; a second install fails.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("prometheus metrics recorder installed");
    Ok(handle)
}

/// Render Prometheus text format from the installed recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

/// HTTP requests handled (counter, labels: operation).
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
/// Store failures surfaced as 500 (counter, labels: operation).
pub const STORE_ERRORS_TOTAL: &str = "store_errors_total";
/// Schema initialization attempts (counter).
pub const SCHEMA_BOOTSTRAP_ATTEMPTS_TOTAL: &str = "schema_bootstrap_attempts_total";
/// Schema readiness (gauge). 1 = ready, 0 = not yet.
pub const SCHEMA_READY: &str = "schema_ready";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_recorder_renders_recorded_counter() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!(HTTP_REQUESTS_TOTAL, "operation" => "list").increment(2);
        });
        let output = render(&handle);
        assert!(output.contains("http_requests_total"), "got: {output}");
        assert!(output.contains("operation=\"list\""), "got: {output}");
    }

    #[test]
    fn metric_constants_are_snake_case() {
        let names = [
            HTTP_REQUESTS_TOTAL,
            STORE_ERRORS_TOTAL,
            SCHEMA_BOOTSTRAP_ATTEMPTS_TOTAL,
            SCHEMA_READY,
        ];
        for name in names {
            assert!(
                name.chars().all(|c| c.is_ascii_lowercase() || c == '_'),
                "metric name '{name}' must be snake_case"
            );
        }
    }
}
