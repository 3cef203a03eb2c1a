//! Structured logging setup.
//!
//! Output format is selected by the `LOG_FORMAT` environment variable:
//! `json` for log aggregation in production, anything else for
//! human-readable text. Level filtering comes from `RUST_LOG`
//! (default `info`), e.g. `RUST_LOG=bl_identity=debug,tower_http=info`.
//!
//! ```rust,ignore
//! bl_common::logging::init_logging("bl-api-server");
//! tracing::info!(user_id = %id, "role updated");
//! ```

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Install the global tracing subscriber for the given service.
///
/// Must be called once, before any log output, at the top of `main`.
pub fn init_logging(_service_name: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(true)
                    .flatten_event(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(true),
            )
            .init();
    }
}
