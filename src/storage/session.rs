//! Per-store session state.
//!
//! A [`StoreSession`] is built once when a store is opened and dropped when it
//! is closed. It carries the only state kstab keeps between commands: the
//! resolved store type and the lazily prompted password.

use crate::error::Result;
use crate::prompt::Prompter;
use crate::storage::store_type::{infer_store_type, StoreType};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Produce the `-keystore`/`-storepass`/`-storetype` flag triple.
///
/// `prefix` distinguishes the two stores of a two-store operation: `"src"`
/// yields `-srckeystore`, `-srcstorepass`, `-srcstoretype`; an empty prefix
/// yields the plain flags.
///
/// # Example
///
/// ```
/// use kstab::storage::session::store_args;
/// use kstab::storage::store_type::StoreType;
/// use std::path::Path;
///
/// let args = store_args("dest", Path::new("a.p12"), "secret", StoreType::Pkcs12);
/// assert_eq!(args[0], "-destkeystore");
/// assert_eq!(args[5], "PKCS12");
/// ```
pub fn store_args(prefix: &str, path: &Path, password: &str, store_type: StoreType) -> Vec<String> {
    vec![
        format!("-{}keystore", prefix),
        path.to_string_lossy().into_owned(),
        format!("-{}storepass", prefix),
        password.to_string(),
        format!("-{}storetype", prefix),
        store_type.as_keytool_arg().to_string(),
    ]
}

/// An opened store: path, type and cached password.
#[derive(Debug, Clone)]
pub struct StoreSession {
    path: PathBuf,
    store_type: StoreType,
    password: Option<Zeroizing<String>>,
}

impl StoreSession {
    /// Open a session for `path`.
    ///
    /// The type is `type_override` when given, otherwise inferred from the
    /// extension with `default_type` as the fallback.
    pub fn open(path: &Path, type_override: Option<StoreType>, default_type: StoreType) -> Self {
        let store_type = type_override.unwrap_or_else(|| infer_store_type(path, default_type));
        Self {
            path: path.to_path_buf(),
            store_type,
            password: None,
        }
    }

    /// Seed the password cache, e.g. from a command-line flag.
    pub fn with_password(mut self, password: Zeroizing<String>) -> Self {
        self.password = Some(password);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store_type(&self) -> StoreType {
        self.store_type
    }

    /// Whether a password has been supplied or prompted already.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Return the cached password, prompting for it on first use.
    pub fn password(&mut self, prompter: &mut dyn Prompter) -> Result<&str> {
        if self.password.is_none() {
            let prompt = format!("Password for {}: ", self.path.display());
            self.password = Some(prompter.secret(&prompt)?);
        }
        Ok(self.password.as_deref().map(String::as_str).unwrap_or_default())
    }

    /// Replace the cached password.
    pub fn set_password(&mut self, password: Zeroizing<String>) {
        self.password = Some(password);
    }

    /// Drop the cached password so the next use prompts again.
    pub fn forget_password(&mut self) {
        self.password = None;
    }

    /// The store flag triple for this session, resolving the password first.
    pub fn store_args(&mut self, prompter: &mut dyn Prompter, prefix: &str) -> Result<Vec<String>> {
        let store_type = self.store_type;
        let path = self.path.clone();
        let password = self.password(prompter)?;
        Ok(store_args(prefix, &path, password, store_type))
    }
}
