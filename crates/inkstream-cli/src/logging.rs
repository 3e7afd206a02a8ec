//! Tracing setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Build the log filter. `RUST_LOG` wins over the `-v` count.
pub fn filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "inkstream_extractor=debug,inkstream_cli=debug,warn",
        _ => "trace",
    }
}

/// Install the global subscriber, logging to stderr so stdout stays clean
/// for documents.
pub fn init(verbose: u8) {
    // Ignore a second install attempt
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter(verbose))
        .with_target(verbose > 0)
        .try_init();
}
