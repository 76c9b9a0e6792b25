use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "info,orderflow=debug";

/// Installs the global subscriber: human-readable events on stderr, filtered by `RUST_LOG`.
///
/// Stdout is left to the receipt output.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .init();
}
