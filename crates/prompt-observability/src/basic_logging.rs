use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Console-only logging for builds without the `observability` feature.
///
/// `LOG_LEVEL` sets the level of the SDK crates (default `info`); `RUST_LOG`
/// overrides the whole filter.
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "prompt_sdk={level},prompt_auth={level},tower_http=warn,hyper=warn,reqwest=warn",
            level = log_level
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    // A test harness or the host application may have installed one already.
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
