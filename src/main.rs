use std::sync::Arc;

use ctxlog::cli::build_cli;
use ctxlog::internal::config::{get_version_info, AppConfig};
use ctxlog::{fatal_and_exit, trace, tracef, Backend, ContextualLogger};
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Parse command line arguments first
    let matches = build_cli().get_matches();
    let config = match AppConfig::load_from_args(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let backend = match Backend::from_config(&config.logging) {
        Ok(backend) => Arc::new(backend),
        Err(e) => {
            eprintln!("Failed to initialize logger: {}", e);
            std::process::exit(1);
        }
    };
    backend.set_global_default()?;

    info!("Version: {}", get_version_info());
    info!("Level: {}", backend.level());

    let logger = ContextualLogger::new(Arc::clone(&backend), "main");
    let message = matches
        .get_one::<String>("message")
        .map(|s| s.as_str())
        .unwrap_or("Hello World");

    logger.with_call_site().info(message);

    if matches.get_flag("trace") {
        let tracer = ContextualLogger::tracer(Arc::clone(&backend));
        trace!(tracer, "{}", message);
        tracef!(tracer, "%s says %s", tracer.name(), message);
    }

    if let Some(reason) = matches.get_one::<String>("fatal") {
        let err = anyhow::anyhow!(reason.clone());
        if matches.get_flag("no-function") {
            logger.fatal_and_exit(err);
        }
        fatal_and_exit!(logger, err);
    }

    Ok(())
}
