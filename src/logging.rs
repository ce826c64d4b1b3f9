use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info,hearth=debug";

/// Install the global tracing subscriber.
///
/// Honours `RUST_LOG`; falls back to `info,hearth=debug`. Calling it twice
/// is harmless, the second install is ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
