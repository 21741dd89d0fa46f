//! Error taxonomy shared by the engine and the request boundary.

use thiserror::Error as ThisError;

/// Errors produced while validating input or optimizing routes.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A caller-supplied value is out of range or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The delivery list was empty.
    #[error("no deliveries provided")]
    EmptyInput,
    /// The optimize call ran past its deadline.
    #[error("computation timed out after {elapsed_ms} ms (limit {limit_ms} ms)")]
    ComputationTimeout {
        /// Configured limit in milliseconds.
        limit_ms: u64,
        /// Time spent when the deadline was detected.
        elapsed_ms: u64,
    },
    /// A request body or config file was not valid JSON for its schema.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The worker pool could not be created.
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Status code the transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) | Self::EmptyInput | Self::Json(_) => 400,
            Self::ComputationTimeout { .. } => 504,
            Self::ThreadPool(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::invalid_argument("x").status_code(), 400);
        assert_eq!(Error::EmptyInput.status_code(), 400);
        let timeout = Error::ComputationTimeout {
            limit_ms: 10,
            elapsed_ms: 12,
        };
        assert_eq!(timeout.status_code(), 504);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::invalid_argument("num_couriers must be positive").to_string(),
            "invalid argument: num_couriers must be positive"
        );
        assert_eq!(Error::EmptyInput.to_string(), "no deliveries provided");
    }
}
