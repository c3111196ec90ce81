//! Logging setup for the binary.
//!
//! Log lines go to stderr so stdout stays reserved for the report itself.
//! Verbosity follows `RUST_LOG` and defaults to `info`. Library code only
//! emits events and never installs a subscriber.

use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the global stderr subscriber.
///
/// Calling this more than once (or after another subscriber was installed)
/// is harmless; later calls are ignored.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .ok();
}
