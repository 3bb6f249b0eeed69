// Logging setup, powered by tracing-subscriber.
//
// `RUST_LOG` wins when set. Otherwise `LOG_LEVEL` (default `info`) is the
// base directive and the HTTP stack is capped at `warn`.

use std::env;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const NOISY: &[(&str, &str)] = &[
    ("hyper", "warn"),
    ("hyper_util", "warn"),
    ("reqwest", "warn"),
    ("tower_http", "warn"),
];

fn build_env_filter(level: &str) -> EnvFilter {
    let mut directives = vec![level.to_string()];
    for (target, lvl) in NOISY {
        directives.push(format!("{target}={lvl}"));
    }

    EnvFilter::try_new(directives.join(",")).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Calling it twice is harmless; the second
/// call is ignored.
pub fn init_logging() {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
            build_env_filter(&level)
        }
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init();
}
