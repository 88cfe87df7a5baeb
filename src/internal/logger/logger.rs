// src/internal/logger/logger.rs

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use tracing::{subscriber::Interest, Dispatch, Metadata, Subscriber};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{
        self as tfmt,
        format::Writer,
        time::FormatTime,
        writer::{BoxMakeWriter, MakeWriter},
    },
    layer::{Context, Layered, SubscriberExt},
    Layer, Registry,
};

use super::callsite::{trim_to_project_root, CallSite};
use super::{Format, Level, LogError};
use crate::internal::config::LoggingConfig;

type Filtered = Layered<LevelGate, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// The leveled logging engine behind every `ContextualLogger`.
///
/// Built once by the process entry point and shared through `Arc`. Entries are
/// dispatched to its own subscriber, so several backends can coexist in one
/// process without touching the global `tracing` default.
pub struct Backend {
    dispatch: Dispatch,
    level: Arc<AtomicU8>,
    project_root_marker: Option<String>,
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("level", &self.level())
            .field("project_root_marker", &self.project_root_marker)
            .finish()
    }
}

impl Backend {
    /// Build a backend writing to the sinks described by `cfg`
    pub fn from_config(cfg: &LoggingConfig) -> Result<Self, LogError> {
        let mut sinks = Vec::new();

        if !cfg.disable_console {
            sinks.push(Sink::stdout(cfg.color));
        }

        if let Some(output_path) = &cfg.output_path {
            let log_file = create_log_file(output_path, cfg.append_to_file)?;
            sinks.push(Sink::writer(SharedWriter::new(log_file)));
        }

        Self::with_sinks(cfg, sinks)
    }

    /// Build a backend with explicit sinks; `cfg` supplies level, format and
    /// path trimming only.
    pub fn with_sinks(cfg: &LoggingConfig, sinks: Vec<Sink>) -> Result<Self, LogError> {
        let level: Level = cfg.level.parse()?;
        let format: Format = cfg.format.parse()?;

        let level = Arc::new(AtomicU8::new(level as u8));
        let gate = LevelGate {
            level: Arc::clone(&level),
        };
        let layers: Vec<BoxedLayer> = sinks.into_iter().map(|s| s.into_layer(format)).collect();

        let subscriber = tracing_subscriber::registry().with(gate).with(layers);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            level,
            project_root_marker: cfg
                .project_root_marker
                .clone()
                .filter(|marker| !marker.is_empty()),
        })
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Acquire))
    }

    /// Takes effect for the next entry; no callsite interest is rebuilt.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::Release);
    }

    pub fn is_debug(&self) -> bool {
        self.level() == Level::Debug
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    /// Route plain `tracing` macros through this backend as well.
    pub fn set_global_default(&self) -> Result<(), LogError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }

    pub fn normalize_path<'a>(&self, path: &'a str) -> &'a str {
        trim_to_project_root(path, self.project_root_marker.as_deref())
    }

    pub(crate) fn emit(&self, record: Record<'_>) {
        let file = record.site.map(|site| self.normalize_path(site.file()));
        let line = record.site.map(|site| site.line());
        let function = record.site.and_then(|site| site.function());
        let fields = (!record.fields.is_empty()).then(|| tracing::field::display(record.fields));
        let severity = (record.level == Level::Fatal).then_some("fatal");

        macro_rules! emit_at {
            ($lvl:expr) => {
                tracing::event!(
                    target: "ctxlog",
                    $lvl,
                    logger = record.logger,
                    severity,
                    File = file,
                    Line = line,
                    Function = function,
                    Error = record.error,
                    fields,
                    "{}",
                    record.message
                )
            };
        }

        tracing::dispatcher::with_default(&self.dispatch, || match record.level {
            Level::Debug => emit_at!(tracing::Level::DEBUG),
            Level::Info => emit_at!(tracing::Level::INFO),
            Level::Warn => emit_at!(tracing::Level::WARN),
            Level::Error | Level::Fatal => emit_at!(tracing::Level::ERROR),
        });
    }
}

/// Per-event level check against the backend's current threshold.
///
/// Callsite interest and the max-level hint are process-wide in `tracing`
/// and shared with every other live dispatcher, so this layer never caches a
/// decision there and reads the threshold on each event instead.
struct LevelGate {
    level: Arc<AtomicU8>,
}

impl<S: Subscriber> Layer<S> for LevelGate {
    fn register_callsite(&self, _metadata: &'static Metadata<'static>) -> Interest {
        Interest::sometimes()
    }

    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        let threshold = Level::from_u8(self.level.load(Ordering::Acquire)).as_filter();
        *metadata.level() <= threshold
    }

    fn max_level_hint(&self) -> Option<LevelFilter> {
        None
    }
}

/// One entry on its way to the backend.
pub(crate) struct Record<'a> {
    pub level: Level,
    pub logger: &'a str,
    pub site: Option<&'a CallSite>,
    pub error: Option<&'a str>,
    pub fields: &'a Fields,
    pub message: fmt::Arguments<'a>,
}

/// Extra key/value pairs attached to a logger, rendered as `k=v k=v`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, String)>);

impl Fields {
    /// Insert or replace `key`
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// One output of a backend.
pub struct Sink {
    writer: BoxMakeWriter,
    ansi: bool,
}

impl Sink {
    pub fn stdout(ansi: bool) -> Self {
        Self {
            writer: BoxMakeWriter::new(io::stdout),
            ansi,
        }
    }

    /// Plain-text sink over any writer factory, e.g. a `SharedWriter`.
    pub fn writer<M>(make_writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self {
            writer: BoxMakeWriter::new(make_writer),
            ansi: false,
        }
    }

    fn into_layer(self, format: Format) -> BoxedLayer {
        let layer = tfmt::layer()
            .with_writer(self.writer)
            .with_ansi(self.ansi)
            .with_timer(Rfc3339Nano)
            .with_level(true)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false);

        match format {
            Format::Full => layer.boxed(),
            Format::Compact => layer.compact().boxed(),
            Format::Json => layer.json().boxed(),
        }
    }
}

/// Full RFC 3339 timestamps with nanoseconds, in UTC.
struct Rfc3339Nano;

impl FormatTime for Rfc3339Nano {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true))
    }
}

/// Create or open log file based on configuration
fn create_log_file(path: &str, append: bool) -> io::Result<fs::File> {
    let path = Path::new(path);

    // Ensure directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
}

/// Thread-safe writer handle; clones share the same underlying writer.
pub struct SharedWriter<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for SharedWriter<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: io::Write> SharedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }
}

impl SharedWriter<Vec<u8>> {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        match self.inner.lock() {
            Ok(buf) => String::from_utf8_lossy(&buf).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}

impl<W: io::Write> io::Write for SharedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))?
            .flush()
    }
}

impl<'a, W: io::Write + 'a> MakeWriter<'a> for SharedWriter<W> {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Debug-only trace through a `ContextualLogger`; arguments are not built
/// unless tracing is on and the backend is at debug level.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        if logger.trace_enabled() {
            logger.trace(format_args!($($arg)+));
        }
    }};
}

/// Printf-style trace; see `ContextualLogger::tracef`.
#[macro_export]
macro_rules! tracef {
    ($logger:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        if logger.trace_enabled() {
            logger.tracef($template, &[$(&$arg as &dyn ::std::fmt::Display),*]);
        }
    }};
}

/// Log a fatal entry with file, line and function, then exit the process.
#[macro_export]
macro_rules! fatal_and_exit {
    ($logger:expr, $err:expr) => {
        $logger.fatal_and_exit_at(Some($crate::call_site!()), $err)
    };
}
