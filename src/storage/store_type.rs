//! Store type inference from file names.

use crate::error::KsError;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The on-disk format of a key store, as named on the `keytool` command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StoreType {
    /// Java KeyStore (`-storetype JKS`).
    Jks,
    /// PKCS#12 (`-storetype PKCS12`).
    Pkcs12,
}

impl StoreType {
    /// The value passed after `-storetype`.
    pub fn as_keytool_arg(&self) -> &'static str {
        match self {
            StoreType::Jks => "JKS",
            StoreType::Pkcs12 => "PKCS12",
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_keytool_arg())
    }
}

impl FromStr for StoreType {
    type Err = KsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jks" => Ok(StoreType::Jks),
            "pkcs12" | "p12" => Ok(StoreType::Pkcs12),
            other => Err(KsError::Config(format!(
                "Unsupported store type: '{}'. Use 'JKS' or 'PKCS12'",
                other
            ))),
        }
    }
}

/// Infer the store type from the file extension.
///
/// `.jks` maps to JKS, `.p12` and `.pkcs12` map to PKCS12 (case-insensitive).
/// Anything else, including a missing extension, yields `default`. The file
/// is never opened.
///
/// # Example
///
/// ```
/// use kstab::storage::store_type::{infer_store_type, StoreType};
/// use std::path::Path;
///
/// assert_eq!(infer_store_type(Path::new("certs/server.P12"), StoreType::Jks), StoreType::Pkcs12);
/// assert_eq!(infer_store_type(Path::new("cacerts"), StoreType::Jks), StoreType::Jks);
/// ```
pub fn infer_store_type(path: &Path, default: StoreType) -> StoreType {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jks") => StoreType::Jks,
        Some("p12") | Some("pkcs12") => StoreType::Pkcs12,
        _ => default,
    }
}
