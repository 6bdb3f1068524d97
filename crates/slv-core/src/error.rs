//! Validation errors raised while turning user input into a [`Config`](crate::config::Config).
//!
//! Every variant is reported before any query runs.

/// Result alias for slv-core operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid period `{0}`")]
    InvalidPeriod(String),

    #[error("invalid connection string `{0}` (expected user:password@host[:port][/database])")]
    InvalidConnection(String),

    #[error("invalid count `{0}`: must be at least 1")]
    InvalidCount(u64),

    #[error("invalid severity `{input}`: {reason}")]
    InvalidSeverity { input: String, reason: &'static str },

    #[error("unknown profile `{0}`")]
    UnknownProfile(String),

    #[error("cannot read profile document: {0}")]
    ProfileDocument(#[from] config::ConfigError),

    #[error("--{first} not allowed with --{second}")]
    ConflictingOptions {
        first: &'static str,
        second: &'static str,
    },
}

impl Error {
    /// True for malformed or unknown user input, as opposed to option
    /// combinations that conflict.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Error::ConflictingOptions { .. })
    }
}
