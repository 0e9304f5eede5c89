//! Per-subsystem diagnostics and the aggregate crate error.
//!
//! Lex/parse/type errors are *collected*, not early-exited on (spec §7):
//! a pass returns `Vec<Diagnostic>` alongside its (possibly withheld)
//! output. `Error` below is reserved for the "no module at all" case a
//! driver propagates with `?`.

use std::fmt;

/// Where in the source a diagnostic originates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub filename: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename, self.line)
    }
}

/// One diagnostic collected during lexing, parsing, or type checking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{location}: {message}")]
pub struct Diagnostic {
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Diagnostic { location, message: message.into() }
    }
}

/// Aggregate failure for a pass that could not produce any output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("lexing failed with {0} error(s)")]
    Lex(usize),
    #[error("parsing failed with {0} error(s)")]
    Parse(usize),
    #[error("type checking failed with {0} error(s)")]
    Type(usize),
    #[error(transparent)]
    Rt(#[from] RtError),
}

/// OS-facing runtime failures (spec §7: "surface as return-value
/// sentinels... accompanied by an out-of-band error channel").
#[derive(Debug, thiserror::Error)]
pub enum RtError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dns resolution failed for {0}")]
    DnsResolution(String),
    #[error("process spawn failed: {0}")]
    Spawn(String),
    #[error("invalid hex string")]
    InvalidHex,
    #[error("invalid base64 string")]
    InvalidBase64,
    #[error("invalid uuid encoding")]
    InvalidUuid,
}
