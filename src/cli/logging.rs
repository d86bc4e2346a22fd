use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is not set
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// Build the stderr subscriber for a run.
///
/// `RUST_LOG` wins over the `debug` switch when set.
pub fn build_subscriber(debug: bool) -> impl Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
}
