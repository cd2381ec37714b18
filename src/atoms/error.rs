// ── Quotewheel Atoms: Error Types ──────────────────────────────────────────
// Single canonical error enum for the crate, built with `thiserror`.
//
// Design rules:
//   • Only boundary failures live here (parsing, config files, pool files).
//   • Rotation and scheduling edge cases never produce an error; they resolve
//     to `None`, `false`, or a defined fallback value.
//   • The `#[from]` attribute wires std/external error conversions.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum QuoteError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML config or pool file could not be parsed.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML rendering failure.
    #[error("TOML render error: {0}")]
    TomlRender(#[from] toml::ser::Error),

    /// A clock time string or component was out of range.
    #[error("Invalid time '{input}': {reason}")]
    InvalidTime { input: String, reason: String },

    /// Configuration is present but unusable.
    #[error("Configuration error: {0}")]
    Config(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl QuoteError {
    /// Create an invalid-time error with the offending input and a reason.
    pub fn invalid_time(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTime { input: input.into(), reason: reason.into() }
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All fallible boundary operations return this type.
pub type QuoteResult<T> = Result<T, QuoteError>;

// ── Conversion: QuoteError → String ───────────────────────────────────────

impl From<QuoteError> for String {
    fn from(e: QuoteError) -> Self {
        e.to_string()
    }
}
