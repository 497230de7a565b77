//! Logging setup shared by the binaries

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub use tracing_subscriber::util::TryInitError;

/// Install the global subscriber
///
/// `RUST_LOG` wins over `logging.level`. `logging.format = "json"` selects
/// the JSON formatter, anything else the pretty one. With `stderr` set,
/// output goes to stderr so stdout stays clean for command output.
pub fn init(config: &LoggingConfig, stderr: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "salesboard={level},tower_http={level}",
            level = config.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    match (config.format.as_str(), stderr) {
        ("json", false) => registry.with(fmt::layer().json()).try_init(),
        ("json", true) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        (_, false) => registry.with(fmt::layer()).try_init(),
        (_, true) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
}
