use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::{Instrument, debug, error, info, info_span, warn};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::is_observability_enabled;

/// Path parameter whose value is attached to request logs.
const COURSE_PHASE_PARAM: &str = "coursePhaseID";

/// Logs every request with the matched route, its course phase when the route
/// has one, the status and the latency. 4xx responses log at `warn`, 5xx at
/// `error`.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let course_phase_id = course_phase_of(&req).unwrap_or_default();
    let request_id = uuid::Uuid::new_v4();

    let span = info_span!("request", %request_id, %method, %route, %course_phase_id);
    let response = next.run(req).instrument(span.clone()).await;

    let _entered = span.enter();
    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();
    if status.is_server_error() {
        error!(status = status.as_u16(), latency_ms, "Request failed");
    } else if status.is_client_error() {
        warn!(status = status.as_u16(), latency_ms, "Request rejected");
    } else {
        debug!(status = status.as_u16(), latency_ms, "Request completed");
    }

    response
}

fn course_phase_of(req: &Request) -> Option<String> {
    let route = req.extensions().get::<MatchedPath>()?.as_str();
    let position = route
        .split('/')
        .position(|segment| segment == format!("{{{COURSE_PHASE_PARAM}}}"))?;
    req.uri().path().split('/').nth(position).map(str::to_string)
}

fn init_tracer(service_name: &str, otlp_endpoint: String) -> Result<Tracer, TraceError> {
    info!(endpoint = %otlp_endpoint, "Initializing OpenTelemetry tracer");

    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, service_name.to_string()),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new(
            "environment",
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        ),
    ]);

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

/// Installs console, rolling file and JSON file layers. Spans go to the OTLP
/// collector at `OTEL_EXPORTER_OTLP_ENDPOINT` when that is set. Falls back to
/// console-only logging when `OBSERVABILITY_ENABLED=false`.
///
/// Log files go to `LOG_DIR` (default `logs`), one pair per service.
pub fn init_tracing(service_name: &str) {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;

    if !is_observability_enabled() {
        crate::basic_logging::init_basic_console_logging();
        return;
    }

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create log directory {log_dir}: {e}. Logging to console only");
        crate::basic_logging::init_basic_console_logging();
        return;
    }

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("prompt_sdk=info,prompt_auth=info,prompt_observability=info,tower_http=warn")
    });

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, &log_dir, format!("{service_name}.log"));
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("warn"));

    let json_appender =
        RollingFileAppender::new(Rotation::DAILY, &log_dir, format!("{service_name}.json"));
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer);

    // Export spans only when a collector is configured.
    let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        registry.init();
        info!("Tracing initialized with file logging");
        return;
    };

    match init_tracer(service_name, endpoint) {
        Ok(tracer) => {
            registry
                .with(tracing_opentelemetry::layer().with_tracer(tracer))
                .init();
            info!("Tracing initialized with OpenTelemetry and file logging");
        }
        Err(e) => {
            registry.init();
            warn!(error = %e, "OpenTelemetry unavailable, continuing with file logging only");
        }
    }
}

pub async fn shutdown_tracer() {
    info!("Shutting down OpenTelemetry tracer");
    global::shutdown_tracer_provider();
}
