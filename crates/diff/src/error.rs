//! Error types for the diff crate.

/// Errors that can occur while parsing patches or deltas, or validating a
/// [`Config`](crate::Config).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A patch block header did not match `@@ -S[,L] +S[,L] @@`.
    #[error("invalid patch header: {line:?}")]
    InvalidHeader { line: String },

    /// A patch body line did not start with `-`, `+` or ` `.
    #[error("invalid patch line: {line:?}")]
    InvalidLine { line: String },

    /// A percent escape was malformed or decoded to invalid UTF-8.
    #[error("invalid escape sequence in {text:?}")]
    InvalidEscape { text: String },

    /// A delta token was malformed or did not fit the base text.
    #[error("invalid delta: {reason}")]
    InvalidDelta { reason: String },

    /// A configuration value was out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for diff results.
pub type Result<T> = std::result::Result<T, Error>;
