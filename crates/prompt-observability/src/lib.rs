//! PROMPT Observability
//!
//! Logging, distributed tracing and metrics for phase servers:
//! - Console, rolling file and JSON file logs
//! - Tracing via OpenTelemetry (OTLP)
//! - Prometheus metrics and HTTP request metrics
//!
//! Everything except console logging sits behind the `observability` feature
//! (on by default). At runtime `OBSERVABILITY_ENABLED=false` switches the
//! exporters off again. Without the feature every function below is a no-op
//! and [`init_tracing`] installs console logging only.
//!
//! ```no_run
//! use prompt_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing("prompt-phase-server");
//!     // ...
//!     shutdown_tracer().await;
//! }
//! ```

use std::sync::OnceLock;

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_app, metrics_middleware, track_authorization_decision,
    track_core_request, track_resolution,
};
#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// `OBSERVABILITY_ENABLED` unset, or anything but `false`/`0`, means on.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        cfg!(feature = "observability")
            && std::env::var("OBSERVABILITY_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true)
    })
}

#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing(_service_name: &str) {
        crate::basic_logging::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<()> {
        None
    }

    pub fn track_authorization_decision(_stage: &'static str, _outcome: &'static str) {}
    pub fn track_core_request(_endpoint: &'static str, _status: u16) {}
    pub fn track_resolution(_outcome: &'static str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
