use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::VancoError;

/// Setup logging for the library
///
/// Installs a global `tracing` subscriber writing to stdout at `level`, which
/// accepts any [`EnvFilter`] directive such as `"debug"` or
/// `"vancopk::levels=trace"`. Fails if a global subscriber is already set.
pub fn setup_log(level: &str) -> Result<(), VancoError> {
    let level = level.to_lowercase();
    let env_filter = EnvFilter::new(&level);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(false)
        .with_timer(CompactTimestamp);

    Registry::default()
        .with(env_filter)
        .with(stdout_layer)
        .try_init()?;

    tracing::debug!("Logging is configured with level: {}", level);
    Ok(())
}

#[derive(Clone)]
struct CompactTimestamp;

impl FormatTime for CompactTimestamp {
    fn format_time(
        &self,
        w: &mut tracing_subscriber::fmt::format::Writer<'_>,
    ) -> Result<(), std::fmt::Error> {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_an_error() {
        let _ = setup_log("debug");
        assert!(matches!(setup_log("info"), Err(VancoError::Logger(_))));
    }
}
