//! Key store module.
//!
//! This module provides the per-store session (path, type, password), store
//! type inference, the table rows and the `keytool`-backed operations.

pub mod keystore;
pub mod metadata;
pub mod session;
pub mod store_type;
