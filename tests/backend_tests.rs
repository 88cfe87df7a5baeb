mod fixtures;

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use ctxlog::{trace, Backend, ContextualLogger, Format, Level, LogError, LoggingConfig};
use fixtures::{capture_backend, capture_backend_with, lines, quiet_config};
use tempfile::TempDir;

// ==================== level tests ====================

#[test]
fn test_level_parsing_accepts_known_names() {
    assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
    assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
    assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
    assert_eq!(" error ".parse::<Level>().unwrap(), Level::Error);
    assert_eq!("Fatal".parse::<Level>().unwrap(), Level::Fatal);
}

#[test]
fn test_level_parsing_rejects_unknown_names() {
    let err = "verbose".parse::<Level>().unwrap_err();
    assert!(matches!(err, LogError::InvalidLevel(ref name) if name == "verbose"));
}

#[test]
fn test_format_parsing() {
    assert_eq!("full".parse::<Format>().unwrap(), Format::Full);
    assert_eq!("compact".parse::<Format>().unwrap(), Format::Compact);
    assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
    assert!(matches!(
        "xml".parse::<Format>(),
        Err(LogError::InvalidFormat(_))
    ));
}

#[test]
fn test_levels_are_ordered_by_severity() {
    assert!(Level::Debug < Level::Info);
    assert!(Level::Info < Level::Warn);
    assert!(Level::Warn < Level::Error);
    assert!(Level::Error < Level::Fatal);
}

// ==================== backend tests ====================

#[test]
fn test_backend_reports_configured_level() {
    let (backend, _out) = capture_backend(Level::Warn);

    assert_eq!(backend.level(), Level::Warn);
    assert!(!backend.is_debug());
    assert!(backend.enabled(Level::Error));
    assert!(!backend.enabled(Level::Info));
}

#[test]
fn test_set_level_changes_filtering() {
    let (backend, out) = capture_backend(Level::Error);
    let logger = ContextualLogger::new(Arc::clone(&backend), "svc");

    logger.info("before");
    backend.set_level(Level::Debug);
    logger.info("after");
    logger.debug("detail");

    assert!(backend.is_debug());
    let output = lines(&out);
    assert_eq!(output.len(), 2, "{output:?}");
    assert!(output[0].contains("after"));
    assert!(output[1].contains("detail"));
}

#[test]
fn test_set_level_holds_while_other_backends_are_built() {
    let stop = Arc::new(AtomicBool::new(false));
    let builders: Vec<_> = (0..3)
        .map(|_| {
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let (backend, _out) = capture_backend(Level::Error);
                    ContextualLogger::new(backend, "noise").debug("dropped");
                }
            })
        })
        .collect();

    for _ in 0..200 {
        let (backend, out) = capture_backend(Level::Info);
        backend.set_level(Level::Debug);
        let mut logger = ContextualLogger::new(backend, "pkg");
        logger.trace_on();
        trace!(logger, "x");

        let output = lines(&out);
        assert_eq!(output.len(), 1, "{output:?}");
    }

    stop.store(true, Ordering::Relaxed);
    for builder in builders {
        builder.join().expect("builder thread");
    }
}

#[test]
fn test_invalid_level_in_config_is_rejected() {
    let cfg = LoggingConfig {
        level: "loud".to_string(),
        disable_console: true,
        ..Default::default()
    };

    let result = Backend::from_config(&cfg);
    assert!(matches!(result, Err(LogError::InvalidLevel(_))));
}

#[test]
fn test_invalid_format_in_config_is_rejected() {
    let cfg = LoggingConfig {
        format: "yaml".to_string(),
        disable_console: true,
        ..Default::default()
    };

    let result = Backend::from_config(&cfg);
    assert!(matches!(result, Err(LogError::InvalidFormat(_))));
}

#[test]
fn test_entries_start_with_rfc3339_timestamp() {
    let (backend, out) = capture_backend(Level::Info);
    ContextualLogger::new(backend, "svc").info("stamped");

    let output = lines(&out);
    let timestamp = output[0].split_whitespace().next().expect("timestamp");
    assert!(
        chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(),
        "not RFC 3339: {timestamp}"
    );
}

#[test]
fn test_compact_format_writes_message() {
    let mut cfg = quiet_config(Level::Info);
    cfg.format = "compact".to_string();
    let (backend, out) = capture_backend_with(cfg);

    ContextualLogger::new(backend, "svc").with_call_site().info("compact entry");

    let output = out.contents();
    assert!(output.contains("compact entry"), "{output}");
    assert!(output.contains("Line="), "{output}");
}

#[test]
fn test_json_format_writes_named_fields() {
    let mut cfg = quiet_config(Level::Info);
    cfg.format = "json".to_string();
    let (backend, out) = capture_backend_with(cfg);

    ContextualLogger::new(backend, "svc").with_call_site().info("json entry");

    let output = out.contents();
    assert!(output.contains("\"json entry\""), "{output}");
    assert!(output.contains("\"Line\":"), "{output}");
    assert!(output.contains("\"File\":\"tests/backend_tests.rs\""), "{output}");
}

#[test]
fn test_project_root_marker_trims_source_paths() {
    let mut cfg = quiet_config(Level::Info);
    cfg.project_root_marker = Some("tests/".to_string());
    let (backend, out) = capture_backend_with(cfg);

    assert_eq!(backend.normalize_path("tests/backend_tests.rs"), "backend_tests.rs");
    assert_eq!(backend.normalize_path("src/lib.rs"), "src/lib.rs");

    ContextualLogger::new(backend, "svc").with_call_site().info("trimmed");

    let output = out.contents();
    assert!(output.contains("backend_tests.rs"), "{output}");
    assert!(!output.contains("tests/backend_tests.rs"), "{output}");
}

#[test]
fn test_backends_do_not_share_output() {
    let (first, first_out) = capture_backend(Level::Info);
    let (second, second_out) = capture_backend(Level::Info);

    ContextualLogger::new(first, "one").info("first only");
    ContextualLogger::new(second, "two").info("second only");

    assert!(first_out.contents().contains("first only"));
    assert!(!first_out.contents().contains("second only"));
    assert!(second_out.contents().contains("second only"));
    assert!(!second_out.contents().contains("first only"));
}

// ==================== file sink tests ====================

fn file_config(dir: &TempDir, append: bool) -> (LoggingConfig, std::path::PathBuf) {
    let path = dir.path().join("nested").join("app.log");
    let cfg = LoggingConfig {
        level: "info".to_string(),
        color: false,
        disable_console: true,
        output_path: Some(path.to_string_lossy().into_owned()),
        append_to_file: append,
        ..Default::default()
    };
    (cfg, path)
}

#[test]
fn test_file_sink_creates_directories_and_writes() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let (cfg, path) = file_config(&dir, false);

    let backend = Arc::new(Backend::from_config(&cfg).expect("backend"));
    ContextualLogger::new(backend, "svc").with_call_site().info("to file");

    let contents = fs::read_to_string(&path).expect("log file");
    assert!(contents.contains("to file"), "{contents}");
    assert!(contents.contains("Line="), "{contents}");
    assert!(!contents.contains('\u{1b}'), "file output must not carry ANSI codes");
}

#[test]
fn test_file_sink_truncates_unless_appending() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let (cfg, path) = file_config(&dir, false);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "old line\n").unwrap();
    let backend = Arc::new(Backend::from_config(&cfg).expect("backend"));
    ContextualLogger::new(backend, "svc").info("fresh");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("old line"));
    assert!(contents.contains("fresh"));

    let (cfg, path) = file_config(&dir, true);
    let backend = Arc::new(Backend::from_config(&cfg).expect("backend"));
    ContextualLogger::new(backend, "svc").info("appended");
    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("fresh"));
    assert!(contents.contains("appended"));
}
