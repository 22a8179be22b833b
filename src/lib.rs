//! kstab: a tabular keystore manager driven by `keytool`
//!
//! This library wraps the JDK `keytool` utility for JKS and PKCS12 stores.
//! It never reads the binary store itself. Instead it:
//!
//! - Builds `keytool` argument vectors for each supported operation
//! - Runs `keytool` as a blocking child process and normalizes its exit status
//! - Parses `-list` output into table rows (alias, entry type, fingerprint)
//! - Assembles X.500 distinguished names for key pair generation
//!
//! # Architecture
//!
//! A [`storage::keystore::KeyStore`] bundles the process runner, the open
//! store session (path, type, cached password) and a caller-supplied
//! [`prompt::Prompter`]. All operations are synchronous; mutating operations
//! are followed by a fresh listing, the store is never cached in memory.
//!
//! # Example
//!
//! ```rust,no_run
//! use kstab::config::Config;
//! use kstab::prompt::TerminalPrompter;
//! use kstab::storage::keystore::{list_entries, open_keystore};
//! use std::path::Path;
//!
//! fn example() -> kstab::Result<()> {
//!     let config = Config::default();
//!     let mut keystore = open_keystore(
//!         &config,
//!         Path::new("server.p12"),
//!         None,
//!         Box::new(TerminalPrompter),
//!     );
//!     for entry in list_entries(&mut keystore)? {
//!         println!("{} {} {}", entry.alias, entry.entry_type, entry.fingerprint);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cert;
pub mod config;
pub mod error;
pub mod keytool;
pub mod parse;
pub mod prompt;
pub mod storage;

// Re-export commonly used types
pub use error::{KsError, Result};
