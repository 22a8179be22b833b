//! Error types for the kstab library.
//!
//! Every failure the core can produce is a variant of [`KsError`]. The core
//! never retries; callers decide whether to re-prompt or abort.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// The main error type for kstab operations.
#[derive(Error, Debug)]
pub enum KsError {
    /// The external tool exited with a non-zero status.
    ///
    /// `message` is the trimmed stdout followed by stderr of the failed run.
    #[error("keytool exited with status {code}: {message}")]
    InvocationFailure { code: i32, message: String },

    /// The store password was rejected by the external tool.
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),

    /// A line that was expected to name an entry did not carry an alias.
    #[error("No alias found in line: {0:?}")]
    MalformedAliasReference(String),

    /// Two entries of the same secret did not agree.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The external tool did not exit within the configured time.
    #[error("{program} did not finish within {timeout:?} and was killed")]
    Timeout { program: String, timeout: Duration },

    /// The external tool could not be started at all.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration or command-line input.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O error (temporary files, prompts, output files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for kstab operations.
pub type Result<T> = std::result::Result<T, KsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KsError::InvocationFailure {
            code: 2,
            message: "keytool error: password incorrect".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "keytool exited with status 2: keytool error: password incorrect"
        );
        assert_eq!(KsError::PasswordMismatch.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<KsError>();
    }

    #[test]
    fn test_timeout_display_keeps_sub_second_precision() {
        let err = KsError::Timeout {
            program: "keytool".to_string(),
            timeout: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "keytool did not finish within 250ms and was killed");
    }
}
