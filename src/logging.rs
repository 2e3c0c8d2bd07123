//! Logger setup.
//!
//! Everything in the crate logs through the `log` facade; this wires it to
//! `env_logger` once, early in `main`.

use std::sync::Once;

/// Logger configuration.
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info",
/// "lanthorn=debug,wgpu_core=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger. Later calls are ignored.
///
/// An explicit filter wins over `RUST_LOG`; with neither, `lanthorn` logs at
/// `info` and wgpu is kept at `warn`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder
                .filter_level(log::LevelFilter::Warn)
                .filter_module("lanthorn", log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}
