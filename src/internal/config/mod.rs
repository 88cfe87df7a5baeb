pub mod config;

pub use config::{get_version_info, AppConfig, LoggingConfig, VERSION};
