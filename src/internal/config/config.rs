use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::internal::logger::{Format, Level};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version information
pub fn get_version_info() -> String {
    let profile = if cfg!(debug_assertions) { "debug" } else { "release" };
    format!("ctxlog version {} ({} build)", VERSION, profile)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub append_to_file: bool,
    #[serde(default)]
    pub disable_console: bool,
    /// Source paths are cut to the part after this segment, e.g. `/myorg/`.
    #[serde(default)]
    pub project_root_marker: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            color: true,
            output_path: None,
            append_to_file: false,
            disable_console: false,
            project_root_marker: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "full".to_string()
}
fn default_true() -> bool {
    true
}

impl LoggingConfig {
    /// Parsed level threshold
    pub fn parsed_level(&self) -> Result<Level, ConfigError> {
        self.level
            .parse()
            .map_err(|e: crate::internal::logger::LogError| ConfigError::Message(e.to_string()))
    }

    /// Parsed output format
    pub fn parsed_format(&self) -> Result<Format, ConfigError> {
        self.format
            .parse()
            .map_err(|e: crate::internal::logger::LogError| ConfigError::Message(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Layered load: defaults, `./ctxlog.*`, the explicit file (if any), then
    /// `CTXLOG_LOGGING__*` environment variables.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "full")?
            .set_default("logging.color", true)?
            .set_default("logging.append_to_file", false)?
            .set_default("logging.disable_console", false)?
            .add_source(File::with_name("ctxlog").required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("CTXLOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;

        app_config.logging.parsed_level()?;
        app_config.logging.parsed_format()?;

        Ok(app_config)
    }

    pub fn load_from_args(matches: &clap::ArgMatches) -> Result<Self, ConfigError> {
        let config_file = matches.get_one::<String>("config").map(|s| s.as_str());
        let mut config = Self::load(config_file)?;

        // Override with CLI args if provided
        if let Some(level) = matches.get_one::<String>("level") {
            config.logging.level = level.clone();
        }

        if let Some(format) = matches.get_one::<String>("format") {
            config.logging.format = format.clone();
        }

        if let Some(path) = matches.get_one::<String>("output") {
            config.logging.output_path = Some(path.clone());
        }

        if matches.get_flag("no-color") {
            config.logging.color = false;
        }

        config.logging.parsed_level()?;
        config.logging.parsed_format()?;

        Ok(config)
    }
}
