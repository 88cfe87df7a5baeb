//! Test fixtures for capturing logger output

#![allow(dead_code)]

use std::sync::Arc;

use ctxlog::{Backend, Level, LoggingConfig, SharedWriter, Sink};

/// Config that never touches the console
pub fn quiet_config(level: Level) -> LoggingConfig {
    LoggingConfig {
        level: level.to_string(),
        color: false,
        disable_console: true,
        ..Default::default()
    }
}

/// Backend writing into an in-memory buffer
pub fn capture_backend(level: Level) -> (Arc<Backend>, SharedWriter<Vec<u8>>) {
    capture_backend_with(quiet_config(level))
}

pub fn capture_backend_with(cfg: LoggingConfig) -> (Arc<Backend>, SharedWriter<Vec<u8>>) {
    let buffer = SharedWriter::new(Vec::new());
    let backend = Backend::with_sinks(&cfg, vec![Sink::writer(buffer.clone())])
        .expect("Failed to build capture backend");
    (Arc::new(backend), buffer)
}

/// Non-empty output lines
pub fn lines(buffer: &SharedWriter<Vec<u8>>) -> Vec<String> {
    buffer
        .contents()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
