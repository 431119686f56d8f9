use harbor_core::value::lookup_str;
use harbor_core::Mapping;
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "debug";

/// The filter directive selected by `logging.filter` or `logging.level`.
pub fn directive(config: &Mapping) -> &str {
    lookup_str(config, "logging.filter")
        .or_else(|| lookup_str(config, "logging.level"))
        .unwrap_or(DEFAULT_DIRECTIVE)
}

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init(config: &Mapping) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(config)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
