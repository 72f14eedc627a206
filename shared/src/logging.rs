//! Tracing subscriber initialisation

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Install the global `tracing` subscriber described by `config`.
///
/// `RUST_LOG` takes precedence over the configured level when set.
/// Fails if a global subscriber has already been installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| format!("Invalid log filter '{}': {}", config.level, e))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| format!("Failed to install tracing subscriber: {}", e))?;
    tracing::debug!(level = %config.level, format = ?config.format, "Tracing initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let config = LoggingConfig {
            format: LogFormat::Compact,
            ..Default::default()
        };
        // The first call may lose a race with other tests in this binary.
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
