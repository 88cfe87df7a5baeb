pub mod cli;
pub mod internal;

// Re-export commonly used types
pub use internal::config::{AppConfig, LoggingConfig};
pub use internal::logger::{
    Backend, CallSite, ContextualLogger, Format, Level, LogError, SharedWriter, Sink, TraceState,
};
