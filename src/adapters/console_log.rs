//! Console logging for host runs.
//!
//! Installs a `tracing_subscriber` formatter on stderr and bridges the
//! `log` facade into it, so every `log::info!` in the crate lands there
//! tagged with its thread name.  The filter comes from `FLOWER_LOG`
//! (`EnvFilter` directives such as `debug` or `exprflower::sequence=trace`),
//! defaulting to `info`.

use tracing_subscriber::EnvFilter;

pub const LEVEL_ENV: &str = "FLOWER_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

/// Build the filter for a `FLOWER_LOG` value.  Empty or unparsable values
/// fall back to `info`.
pub fn filter_from(value: Option<&str>) -> EnvFilter {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the console subscriber.  Returns the active filter directives;
/// fails if a global subscriber or logger is already set.
pub fn init() -> Result<String, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = filter_from(std::env::var(LEVEL_ENV).ok().as_deref());
    let shown = filter.to_string();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .with_target(false)
        .try_init()?;
    Ok(shown)
}
