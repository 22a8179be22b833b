//! `keytool` invocation module.
//!
//! This module provides:
//!
//! - Argument vectors with nested groups and password masking for logs
//! - One argument builder per supported `keytool` operation
//! - A blocking runner that captures output and normalizes exit status
//!
//! # Example
//!
//! ```rust,no_run
//! use kstab::keytool::commands::{list, ListFormat};
//! use kstab::keytool::runner::KeytoolRunner;
//! use kstab::storage::session::store_args;
//! use kstab::storage::store_type::StoreType;
//! use std::path::Path;
//!
//! # fn example() -> kstab::Result<()> {
//! let store = store_args("", Path::new("my.jks"), "changeit", StoreType::Jks);
//! let result = KeytoolRunner::new("keytool").run(&list(ListFormat::Compact, None, store), None)?;
//! println!("{}", result.stdout);
//! # Ok(())
//! # }
//! ```

pub mod args;
pub mod commands;
pub mod runner;
