// src/internal/logger/mod.rs

pub mod callsite;
pub mod contextual;
pub mod level;
pub mod logger;
pub mod template;

pub use callsite::CallSite;
pub use contextual::{ContextualLogger, TraceState};
pub use level::{Format, Level};
pub use logger::{Backend, Fields, SharedWriter, Sink};

// The trace!, tracef!, fatal_and_exit! and call_site! macros are exported at
// the crate root via #[macro_export].

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),
    #[error("Failed to install global logger: {0}")]
    SetGlobal(#[from] tracing::dispatcher::SetGlobalDefaultError),
}
