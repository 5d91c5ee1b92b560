//! Logging initialization.
//!
//! Logs go to stderr in pretty or JSON form; stdout carries only the JSON
//! responses, so the CLI can be piped like a host bridge.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `level` - Default filter directive (`info`, `debug`, ...). `RUST_LOG`
///   overrides it when set.
/// * `json_format` - If true, outputs structured JSON logs; otherwise pretty-printed.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Picker prompts share stderr; plain text when it is not a terminal
        let ansi = console::Term::stderr().features().colors_supported();
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(ansi),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section.
///
/// `--verbose` and `--json-logs` win over the file.
pub fn init_from_config(
    config: &gallery_plus_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    init(
        &effective_level(&config.logging.level, verbose_override),
        json_logs_override || config.logging.format.eq_ignore_ascii_case("json"),
    );
}

/// Configured level, raised to `debug` by `--verbose`.
fn effective_level(configured: &str, verbose: bool) -> String {
    let configured = configured.trim().to_ascii_lowercase();
    match configured.as_str() {
        "trace" => configured,
        _ if verbose => "debug".to_string(),
        "" => "info".to_string(),
        _ => configured,
    }
}
