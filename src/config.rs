//! # Configuration
//!
//! Application settings, layered from an optional file and the environment.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML, YAML or JSON file (format inferred from the extension)
//! 3. `EQUITY_VALUATION__*` environment variables, `__` between levels
//!
//! ```text
//! EQUITY_VALUATION__VALUATION__ITERATIONS=5000
//! EQUITY_VALUATION__PROVIDERS__EDINET__FILINGS_DIR=/data/edinet
//! EQUITY_VALUATION__LOGGING__FORMAT=json
//! ```

use crate::application::services::valuation_pipeline::PipelineConfig;
use crate::infrastructure::output::report_writer::OutputConfig;
use crate::infrastructure::providers::ProvidersConfig;
use crate::telemetry::LoggingConfig;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "EQUITY_VALUATION";

/// All application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pipeline settings.
    pub valuation: PipelineConfig,
    /// Data providers.
    pub providers: ProvidersConfig,
    /// Output files.
    pub output: OutputConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads settings from `path` (if any) and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or a value has the
    /// wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
