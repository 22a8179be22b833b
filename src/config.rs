//! Runtime configuration.
//!
//! The binary fills a [`Config`] from command-line flags and `KSTAB_*`
//! environment variables; library users construct one directly.

use crate::error::{KsError, Result};
use crate::storage::store_type::StoreType;
use std::path::PathBuf;
use std::time::Duration;

/// Program name looked up on `PATH` when no explicit tool is configured.
pub const DEFAULT_KEYTOOL: &str = "keytool";

/// Default key algorithm for `-genkeypair`.
pub const DEFAULT_KEYALG: &str = "RSA";

/// Default key size in bits for `-genkeypair`.
pub const DEFAULT_KEYSIZE: u32 = 2048;

/// Default certificate validity in days for `-genkeypair`.
pub const DEFAULT_VALIDITY_DAYS: u32 = 365;

/// Settings shared by every operation of one kstab run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Path or name of the `keytool` executable.
    pub keytool: PathBuf,

    /// Store type used when the file extension gives no hint.
    pub default_store_type: StoreType,

    /// Kill `keytool` if it runs longer than this.
    pub timeout: Option<Duration>,

    /// Key algorithm for generated key pairs.
    pub keyalg: String,

    /// Key size for generated key pairs.
    pub keysize: u32,

    /// Validity in days for generated key pairs.
    pub validity_days: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keytool: PathBuf::from(DEFAULT_KEYTOOL),
            default_store_type: StoreType::Jks,
            timeout: None,
            keyalg: DEFAULT_KEYALG.to_string(),
            keysize: DEFAULT_KEYSIZE,
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

impl Config {
    /// Set the timeout from a number of seconds; zero disables it.
    pub fn with_timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        self
    }

    /// Reject values `keytool` would refuse anyway, before spawning it.
    pub fn validate(&self) -> Result<()> {
        if self.keytool.as_os_str().is_empty() {
            return Err(KsError::Config("keytool path cannot be empty".to_string()));
        }
        if self.keyalg.trim().is_empty() {
            return Err(KsError::Config("key algorithm cannot be empty".to_string()));
        }
        if self.keysize == 0 {
            return Err(KsError::Config("key size must be positive".to_string()));
        }
        if self.validity_days == 0 {
            return Err(KsError::Config("validity must be at least one day".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.keytool, PathBuf::from("keytool"));
        assert_eq!(config.default_store_type, StoreType::Jks);
        assert_eq!(config.timeout, None);
        assert_eq!(config.keysize, 2048);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_timeout_secs() {
        let config = Config::default().with_timeout_secs(30);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));

        let config = config.with_timeout_secs(0);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn test_validate_rejects_zero_keysize() {
        let config = Config {
            keysize: 0,
            ..Config::default()
        };
        match config.validate() {
            Err(KsError::Config(msg)) => assert!(msg.contains("key size")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_validate_rejects_empty_keyalg() {
        let config = Config {
            keyalg: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
