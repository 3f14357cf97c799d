use tracing_subscriber::EnvFilter;

/// Initialize tracing based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// When `interactive` is true the calendar will take over the terminal, so
/// the level stays at warn regardless of `verbosity`; stderr lines written
/// over the alternate screen would garble it.
///
/// `RUST_LOG` env var overrides the CLI flag if set.  Output goes to stderr
/// so that it stays out of `--print` output.
pub(crate) fn init(verbosity: u8, interactive: bool) {
    let level = level(verbosity, interactive);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={level}", env!("CARGO_CRATE_NAME"))));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn level(verbosity: u8, interactive: bool) -> &'static str {
    match verbosity {
        _ if interactive => "warn",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
