//! Bridge from [`PlasmaConfig`] to telemetry settings.

use plasma_config::PlasmaConfig;
use plasma_telemetry::{FileRotation, LogConfig, LogFormat, TelemetryResult};

/// Convert the logging section to a [`LogConfig`].
///
/// `logging.color_enabled` becomes [`LogConfig::ansi`]. An enabled
/// `logging.file` section switches output to rolling files, which are
/// always written without colour.
///
/// # Errors
///
/// Returns a telemetry config error for an unknown format or rotation name.
pub fn to_log_config(cfg: &PlasmaConfig) -> TelemetryResult<LogConfig> {
    let logging = &cfg.logging;
    let mut log_config = LogConfig::new(&logging.level)
        .with_format(LogFormat::parse(&logging.format)?)
        .with_ansi(logging.color_enabled);

    if logging.file.enabled {
        log_config = log_config.with_file_logging(
            &logging.file.directory,
            &logging.file.prefix,
            FileRotation::parse(&logging.file.rotation)?,
        );
    }

    for directive in &logging.directives {
        log_config = log_config.with_directive(directive);
    }

    Ok(log_config)
}
