use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    // Leak the version string to get a 'static lifetime
    let version: &'static str =
        Box::leak(crate::internal::config::get_version_info().into_boxed_str());

    Command::new("ctxlog")
        .version(version)
        .about("Contextual logging facade demo")
        .arg(
            Arg::new("message")
                .default_value("Hello World")
                .help("Message logged with call-site fields"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to config file (default: ./ctxlog.yaml if present)"),
        )
        .arg(
            Arg::new("level")
                .long("level")
                .short('l')
                .value_parser(["debug", "info", "warn", "error", "fatal"])
                .help("Log level threshold"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["full", "compact", "json"])
                .help("Output format"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Also write entries to this file"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable ANSI colors on the console"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .action(ArgAction::SetTrue)
                .help("Emit the message through a tracer as well (needs --level debug)"),
        )
        .arg(
            Arg::new("fatal")
                .long("fatal")
                .value_name("ERROR")
                .help("Log ERROR as fatal and exit with status 1"),
        )
        .arg(
            Arg::new("no-function")
                .long("no-function")
                .action(ArgAction::SetTrue)
                .requires("fatal")
                .help("Log --fatal with file and line only, without the Function field"),
        )
}
