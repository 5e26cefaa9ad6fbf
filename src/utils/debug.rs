use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

/// Global debug mode flag, initialized once at startup
pub static DEBUG_MODE: Lazy<bool> = Lazy::new(|| std::env::var("BUCKETBILL_DEBUG").is_ok());

/// Default filter when `RUST_LOG` is not set
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "bucketbill=debug,warn"
    } else {
        "warn"
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise warnings are shown, or everything from
/// this crate at debug level when `BUCKETBILL_DEBUG` is set. Calling this twice is harmless.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(*DEBUG_MODE)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
