//! # Structured Logging
//!
//! Subscriber initialisation and span macros built on the tracing ecosystem.
//!
//! In JSON logging mode every event is one JSON object per line, with span
//! fields (such as the analysis `run_id`) attached for correlation.

use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;
use crate::errors::Result;

/// Create a tracing span for one analysis run.
///
/// ```rust,ignore
/// let span = analysis_span!(run_id, records.len());
/// let span = analysis_span!(run_id, records.len(), source = "capture.ndjson");
/// ```
#[macro_export]
macro_rules! analysis_span {
    ($run_id:expr, $record_count:expr) => {
        tracing::info_span!(
            "traffic_analysis",
            run_id = %$run_id,
            record_count = $record_count,
            endpoint_count = tracing::field::Empty
        )
    };
    ($run_id:expr, $record_count:expr, $($field:tt)*) => {
        tracing::info_span!(
            "traffic_analysis",
            run_id = %$run_id,
            record_count = $record_count,
            endpoint_count = tracing::field::Empty,
            $($field)*
        )
    };
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Installing twice is
/// not an error; the first subscriber stays active.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| {
            crate::errors::Error::config(format!("Invalid log filter '{}': {}", config.log_level, e))
        })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    let installed = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if installed.is_err() {
        // Subscriber already set elsewhere (e.g. tests); ignore.
    }
    Ok(())
}

/// Log configuration at startup
pub fn log_config_info(config: &ObservabilityConfig) {
    tracing::info!(
        service_name = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "apiscope configuration"
    );
}
