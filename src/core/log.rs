use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Maps the number of `-v` flags to a log level for the app's own target.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Uses `rust_log` directives as given when present, otherwise limits logging
/// to the app's own target at the verbosity level.
pub fn build_filter(verbosity: u8, rust_log: Option<&str>) -> EnvFilter {
    match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => {
            let level = level_for_verbosity(verbosity).to_string().to_lowercase();
            EnvFilter::new(format!("coinprice={level}"))
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so rendered quotes stay on stdout.
/// `RUST_LOG` replaces the verbosity flag when set.
pub fn init_logging(verbosity: u8) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(build_filter(verbosity, rust_log.as_deref()))
        .init();
}
