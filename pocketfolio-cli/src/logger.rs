use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable read before `RUST_LOG`.
pub const LOG_ENV: &str = "POCKETFOLIO_LOG";

/// Raised on top of whatever filter is in effect when `--verbose` is given.
const VERBOSE_DIRECTIVES: [&str; 3] = [
    "pocketfolio_core=debug",
    "pocketfolio_runner=debug",
    "pocketfolio=debug",
];

fn filter(verbose: bool) -> EnvFilter {
    let base = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    with_verbose(base, verbose)
}

fn with_verbose(base: EnvFilter, verbose: bool) -> EnvFilter {
    if !verbose {
        return base;
    }
    VERBOSE_DIRECTIVES
        .iter()
        .filter_map(|d| d.parse::<Directive>().ok())
        .fold(base, |f, d| f.add_directive(d))
}

/// Compact logs on stderr; stdout is left to command output.
pub fn init_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
