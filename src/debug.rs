//! Process-wide debug level, installed once at startup.
//!
//! Mirrors the tests' `init_debug(DEBUG_LEVEL_ERROR)` call: a small
//! configuration struct set up once, not a monkey-patched global.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Severity threshold for process-wide logging, ordered least to most verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl DebugLevel {
    fn as_tracing_level(self) -> tracing::Level {
        match self {
            DebugLevel::Error => tracing::Level::ERROR,
            DebugLevel::Warn => tracing::Level::WARN,
            DebugLevel::Info => tracing::Level::INFO,
            DebugLevel::Debug => tracing::Level::DEBUG,
            DebugLevel::Trace => tracing::Level::TRACE,
        }
    }
}

static INIT: OnceLock<DebugLevel> = OnceLock::new();

/// Install the process-wide debug level. Idempotent: only the first call
/// takes effect, matching a "no monkey-patching" initialize-once policy.
pub fn init_debug(level: DebugLevel) {
    if INIT.set(level).is_ok() {
        let filter = EnvFilter::new(level.as_tracing_level().to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

/// The level passed to the most recent (first) `init_debug` call, if any.
pub fn current_level() -> Option<DebugLevel> {
    INIT.get().copied()
}
