use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. `RUST_LOG` overrides the default level.
pub fn init_logging(verbose: bool) {
    let (level_filter, level) = default_levels(verbose);
    let app_filter = Targets::new().with_target("expman", level_filter);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
        .with(app_filter)
        .with(env_filter)
        .init();
}

// Silent unless `--verbose` or `RUST_LOG` asks for more.
fn default_levels(verbose: bool) -> (LevelFilter, &'static str) {
    if verbose {
        (LevelFilter::DEBUG, "debug")
    } else {
        (LevelFilter::OFF, "off")
    }
}
