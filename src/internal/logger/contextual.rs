// src/internal/logger/contextual.rs

use std::fmt::{self, Display};
use std::sync::Arc;

use uuid::Uuid;

use super::callsite::CallSite;
use super::logger::{Backend, Fields, Record};
use super::template::{escape_percent, render};
use super::Level;

/// Whether `trace`/`tracef` emit anything on this instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceState {
    Enabled,
    #[default]
    Disabled,
}

/// A named logger over a shared `Backend` that adds call-site fields, a
/// toggleable trace path and a fatal-and-exit helper.
#[derive(Debug, Clone)]
pub struct ContextualLogger {
    backend: Arc<Backend>,
    name: String,
    trace_id: String,
    call_site: Option<CallSite>,
    fields: Fields,
    trace: TraceState,
}

impl ContextualLogger {
    /// Package logger labeled `name`, tracing off.
    pub fn new(backend: Arc<Backend>, name: impl Into<String>) -> Self {
        Self {
            backend,
            name: name.into(),
            trace_id: new_trace_id(),
            call_site: None,
            fields: Fields::default(),
            trace: TraceState::Disabled,
        }
    }

    /// Ad-hoc diagnostic logger with tracing on.
    pub fn tracer(backend: Arc<Backend>) -> Self {
        Self {
            trace: TraceState::Enabled,
            ..Self::new(backend, "Tracer")
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn trace_state(&self) -> TraceState {
        self.trace
    }

    pub fn call_site(&self) -> Option<&CallSite> {
        self.call_site.as_ref()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }

    /// Logger whose entries carry `File` and `Line` of the code calling this.
    #[track_caller]
    pub fn with_call_site(&self) -> Self {
        self.with_call_site_at(Some(CallSite::caller()))
    }

    /// Like `with_call_site` with an explicit location. `None` returns the
    /// logger unchanged.
    pub fn with_call_site_at(&self, site: Option<CallSite>) -> Self {
        match site {
            Some(site) => Self {
                call_site: Some(site),
                trace_id: new_trace_id(),
                trace: TraceState::Disabled,
                ..self.clone()
            },
            None => self.clone(),
        }
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl Display) -> Self {
        let mut logger = self.clone();
        logger.fields.insert(key, value.to_string());
        logger
    }

    pub fn log(&self, level: Level, msg: impl Display) {
        if !self.backend.enabled(level) {
            return;
        }
        self.emit(level, self.call_site.as_ref(), None, format_args!("{}", msg));
    }

    pub fn debug(&self, msg: impl Display) {
        self.log(Level::Debug, msg);
    }

    pub fn info(&self, msg: impl Display) {
        self.log(Level::Info, msg);
    }

    pub fn warn(&self, msg: impl Display) {
        self.log(Level::Warn, msg);
    }

    pub fn error(&self, msg: impl Display) {
        self.log(Level::Error, msg);
    }

    pub fn trace_on(&mut self) {
        self.trace = TraceState::Enabled;
    }

    pub fn trace_off(&mut self) {
        self.trace = TraceState::Disabled;
    }

    /// True when the backend is at debug level and tracing is on here.
    pub fn trace_enabled(&self) -> bool {
        self.trace == TraceState::Enabled && self.backend.is_debug()
    }

    /// Debug entry `<trace id> File:<file> Line:<line> <args>`.
    ///
    /// Prefer the `trace!` macro, which skips building `args` when disabled.
    #[track_caller]
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        if !self.trace_enabled() {
            return;
        }
        let site = CallSite::caller();
        let file = self.backend.normalize_path(site.file());
        self.emit(
            Level::Debug,
            self.call_site.as_ref(),
            None,
            format_args!("{} File:{} Line:{} {}", self.trace_id, file, site.line(), args),
        );
    }

    /// Printf-style trace rendered with `template::render`.
    ///
    /// The trace prefix is escaped before it joins the template, and argument
    /// text is never read as directives, so a `%` coming from a path or an
    /// argument always prints literally.
    #[track_caller]
    pub fn tracef(&self, template: &str, args: &[&dyn Display]) {
        if !self.trace_enabled() {
            return;
        }
        let site = CallSite::caller();
        let file = self.backend.normalize_path(site.file());
        let prefix = format!("{} File:{} Line:{} ", self.trace_id, file, site.line());
        let message = render(&format!("{}{}", escape_percent(&prefix), template), args);
        self.emit(
            Level::Debug,
            self.call_site.as_ref(),
            None,
            format_args!("{}", message),
        );
    }

    /// Log `err` at fatal severity with the caller's file and line, then exit
    /// with status 1. Use `fatal_and_exit!` to also record the function.
    #[track_caller]
    pub fn fatal_and_exit(&self, err: impl Display) -> ! {
        self.fatal_and_exit_at(Some(CallSite::caller()), err)
    }

    pub fn fatal_and_exit_at(&self, site: Option<CallSite>, err: impl Display) -> ! {
        self.log_fatal(site, err);
        std::process::exit(1)
    }

    /// The entry `fatal_and_exit` writes, without exiting. With no call site
    /// only the `Error` field is attached.
    pub fn log_fatal(&self, site: Option<CallSite>, err: impl Display) {
        let error = err.to_string();
        self.emit(
            Level::Fatal,
            site.as_ref(),
            Some(error.as_str()),
            format_args!("Fatal Error"),
        );
    }

    fn emit(
        &self,
        level: Level,
        site: Option<&CallSite>,
        error: Option<&str>,
        message: fmt::Arguments<'_>,
    ) {
        self.backend.emit(Record {
            level,
            logger: &self.name,
            site,
            error,
            fields: &self.fields,
            message,
        });
    }
}

fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}
