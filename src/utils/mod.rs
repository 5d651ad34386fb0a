pub mod build_info;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "tally_core=info,tally_store=info";

/// Installs the global subscriber. A non-empty `RUST_LOG` replaces the
/// default filter. Logs go to stderr so they never mix with command output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter(rust_log.as_deref()))
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Parses `rust_log`, falling back to the default when unset, blank or invalid.
pub(crate) fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{filter::LevelFilter, Layer, Registry};

    fn max_level(filter: &EnvFilter) -> Option<LevelFilter> {
        <EnvFilter as Layer<Registry>>::max_level_hint(filter)
    }

    #[test]
    fn rust_log_replaces_the_default_filter() {
        let filter = env_filter(Some("tally_core=debug"));
        let rendered = filter.to_string();
        assert!(rendered.contains("tally_core=debug"));
        assert!(!rendered.contains("tally_core=info"));
        assert_eq!(max_level(&filter), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn default_filter_covers_the_store_crate() {
        for rust_log in [None, Some(""), Some("   ")] {
            let rendered = env_filter(rust_log).to_string();
            assert!(rendered.contains("tally_core=info"));
            assert!(rendered.contains("tally_store=info"));
        }
        assert_eq!(max_level(&env_filter(None)), Some(LevelFilter::INFO));
    }
}
