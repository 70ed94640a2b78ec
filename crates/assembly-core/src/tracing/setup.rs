//! Subscriber installation for binaries and tests that embed the engine.

use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding `EnvFilter` directives, for example
/// `ASSEMBLY_LOG=assembly_analysis::spectrum=debug,assembly_analysis::mining=trace`.
pub const LOG_ENV: &str = "ASSEMBLY_LOG";

/// Directives used when `ASSEMBLY_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "assembly=info";

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Filter built from `ASSEMBLY_LOG`, falling back to `assembly=info`.
pub fn env_filter() -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber once per process.
///
/// Returns whether the subscriber is ours. It is not when the host
/// application installed its own before the first call; later calls
/// report the outcome of the first.
pub fn init_tracing() -> bool {
    *INSTALLED.get_or_init(|| {
        tracing_subscriber::registry()
            .with(fmt::layer().compact().with_target(true).with_thread_names(true))
            .with(env_filter())
            .try_init()
            .is_ok()
    })
}
