use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::DEFAULT_LOG_FILTER;

static LOG_INIT: Once = Once::new();

/// Install the global tracing subscriber, once per process.
///
/// `RUST_LOG` wins over `default_value`, which wins over [`DEFAULT_LOG_FILTER`].
/// Later calls are no-ops, so every test may call it.
pub fn log_init(default_value: Option<&str>) {
    LOG_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::try_new(default_value.unwrap_or(DEFAULT_LOG_FILTER))
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
        });
        tracing_setup(filter);
        debug!("tracing initialized");
    });
}

fn tracing_setup(filter: EnvFilter) {
    let format = tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .compact();

    // another subscriber may already be installed, e.g. by a test harness
    drop(
        tracing_subscriber::registry()
            .with(filter)
            .with(format)
            .try_init(),
    );
}

#[cfg(test)]
mod tests {
    use super::log_init;

    #[test]
    fn test_log_init_twice() {
        log_init(Some("debug"));
        log_init(Some("not a ( valid filter"));
        tracing::info!("still logging");
    }
}
