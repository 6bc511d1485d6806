use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

/// Initializes the application's logging and tracing infrastructure.
///
/// The subscriber is a registry with two layers:
/// 1. **EnvFilter**: verbosity taken from `RUST_LOG`
/// 2. **fmt**: human-readable output on stdout
///
/// # Default Filtering Behavior
/// Without `RUST_LOG` the filter falls back to `info` for application code,
/// `warn` for `diesel` and `info` for `tower_http` request spans.
///
/// Call exactly once, at the start of `main`. A second call is ignored.
pub fn init_logging() {
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "info,diesel=warn,tower_http=info".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}
