//! Certificate subject helpers.
//!
//! kstab never builds certificates itself; `keytool` does. This module only
//! assembles the distinguished name passed to `-genkeypair`.

pub mod dname;
