//! Tracing bootstrap for hosts.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{Result, RuntimeError};

/// Filter used when neither an explicit filter nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a global `fmt` subscriber writing to stderr.
///
/// `filter` takes precedence over `RUST_LOG`; with neither set, only
/// `info` and above is shown.
pub fn init(filter: Option<&str>) -> Result<()> {
    let env_filter = match filter {
        Some(filter) => parse_filter(filter)?,
        None => EnvFilter::try_from_default_env().or_else(|_| parse_filter(DEFAULT_FILTER))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|_| RuntimeError::LoggingInstalled)
}

fn parse_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|source| RuntimeError::LogFilter {
        filter: filter.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_directives() {
        assert!(parse_filter("runtime=debug,combat_core=trace").is_ok());
    }

    #[test]
    fn rejects_malformed_filter() {
        let err = parse_filter("combat_core=loud").expect_err("invalid level");
        assert!(matches!(err, RuntimeError::LogFilter { .. }));
    }
}
