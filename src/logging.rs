//! Logging setup.
//!
//! Diagnostics go to stderr so robot-mode JSON on stdout stays clean for
//! whatever is parsing it.

use std::io::{self, IsTerminal};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive used when `RUST_LOG` is not set.
///
/// Quiet wins over verbosity: `-q` drops everything below errors even if
/// `-v` flags are also present.
fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "lsfgctl=error"
    } else {
        match verbose {
            0 => "lsfgctl=info",
            1 => "lsfgctl=debug",
            _ => "lsfgctl=trace",
        }
    }
}

/// Install the global tracing subscriber.
///
/// Robot mode emits JSON lines with targets for machine filtering; human
/// mode emits compact lines, colored only when stderr is a terminal.
pub fn init_logging(robot_mode: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let base = fmt::layer()
        .with_writer(io::stderr)
        .with_target(robot_mode)
        .with_file(false)
        .with_line_number(false);

    if robot_mode {
        tracing_subscriber::registry()
            .with(filter)
            .with(base.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(base.compact().with_ansi(io::stderr().is_terminal()))
            .init();
    }
}
