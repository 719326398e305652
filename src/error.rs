//! CLI error types.

use thiserror::Error;

/// Exit code for malformed invocations. Matches clap's own parse-error code.
pub const EXIT_USAGE: u8 = 2;

/// Exit code for everything that went wrong after the invocation was accepted.
pub const EXIT_FAILURE: u8 = 1;

/// Errors that terminate an invocation.
///
/// None of these are retried: each one ends the command and is reported on
/// stderr by the binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Malformed flags or arguments, caught before any network call.
    #[error("usage error: {0}")]
    Usage(String),

    /// The API could not be reached (DNS, connection refused, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body was not valid JSON, or JSON of an
    /// unexpected shape where the client itself needs to read it.
    #[error("invalid response: {0}")]
    Decode(String),

    /// A lookup performed by the client itself found nothing.
    #[error("{0}")]
    NotFound(String),

    /// Writing rendered output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Shorthand for [`CliError::Usage`].
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// HTTP status carried by this error; `0` for transport failures and
    /// errors that never reached the network.
    pub fn status(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            _ => 0,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}
