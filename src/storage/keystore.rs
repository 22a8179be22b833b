//! Keystore operations backed by `keytool`.
//!
//! A [`KeyStore`] bundles the runner, the store session and the prompter.
//! Every operation is one blocking `keytool` run; nothing about the store's
//! contents is kept between calls, callers re-list after mutations.
//!
//! All operations take `&mut KeyStore`, so two operations on the same store
//! can never overlap.

use crate::config::Config;
use crate::error::{KsError, Result};
use crate::keytool::commands::{self, KeyPairSpec, ListFormat};
use crate::keytool::runner::KeytoolRunner;
use crate::parse::listing::{parse_list, parse_verbose_aliases};
use crate::prompt::{new_password, Prompter};
use crate::storage::metadata::Entry;
use crate::storage::session::StoreSession;
use crate::storage::store_type::StoreType;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// An opened store and everything needed to operate on it.
pub struct KeyStore {
    runner: KeytoolRunner,
    session: StoreSession,
    prompter: Box<dyn Prompter>,
}

impl KeyStore {
    /// Assemble a store from its parts.
    pub fn new(runner: KeytoolRunner, session: StoreSession, prompter: Box<dyn Prompter>) -> Self {
        Self {
            runner,
            session,
            prompter,
        }
    }

    pub fn session(&self) -> &StoreSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut StoreSession {
        &mut self.session
    }

    pub fn prompter(&mut self) -> &mut dyn Prompter {
        self.prompter.as_mut()
    }

    fn store_args(&mut self) -> Result<Vec<String>> {
        self.session.store_args(self.prompter.as_mut(), "")
    }
}

/// Open `path` with the runner and store type settings of `config`.
///
/// No process is started; the password is asked for on first use.
///
/// # Example
///
/// ```rust,no_run
/// use kstab::config::Config;
/// use kstab::prompt::TerminalPrompter;
/// use kstab::storage::keystore::open_keystore;
/// use std::path::Path;
///
/// let keystore = open_keystore(&Config::default(), Path::new("a.jks"), None, Box::new(TerminalPrompter));
/// ```
pub fn open_keystore(
    config: &Config,
    path: &Path,
    type_override: Option<StoreType>,
    prompter: Box<dyn Prompter>,
) -> KeyStore {
    KeyStore::new(
        KeytoolRunner::from_config(config),
        StoreSession::open(path, type_override, config.default_store_type),
        prompter,
    )
}

/// Probe the cached (or prompted) password with a `-list` run.
///
/// A rejected run yields [`KsError::AuthenticationFailure`] and clears the
/// cached password, so the next call prompts again.
pub fn verify_password(keystore: &mut KeyStore) -> Result<()> {
    let args = commands::list(ListFormat::Compact, None, keystore.store_args()?);

    match keystore.runner.run(&args, None) {
        Ok(_) => Ok(()),
        Err(KsError::InvocationFailure { message, .. }) => {
            warn!(store = %keystore.session.path().display(), "store password rejected");
            keystore.session.forget_password();
            Err(KsError::AuthenticationFailure(message))
        }
        Err(e) => Err(e),
    }
}

/// Make sure the session holds a verified password for an existing store.
///
/// The password is prompted (if not cached) and checked with
/// [`verify_password`]. A store file that does not exist is a
/// [`KsError::Config`] error raised before anything is prompted or run.
/// Retrying after [`KsError::AuthenticationFailure`] is up to the caller.
pub fn unlock(keystore: &mut KeyStore) -> Result<()> {
    if !keystore.session.path().exists() {
        return Err(KsError::Config(format!(
            "{} does not exist",
            keystore.session.path().display()
        )));
    }
    verify_password(keystore)
}

/// Like [`unlock`], but a missing store is about to be created by `keytool`.
///
/// For a new store the password is asked for twice; disagreeing answers
/// yield [`KsError::PasswordMismatch`].
pub fn unlock_or_create(keystore: &mut KeyStore) -> Result<()> {
    if keystore.session.path().exists() {
        return verify_password(keystore);
    }
    if !keystore.session.has_password() {
        let password = new_password(keystore.prompter.as_mut(), "store password")?;
        keystore.session.set_password(password);
    }
    Ok(())
}

/// List the store as table rows, in `keytool` output order.
pub fn list_entries(keystore: &mut KeyStore) -> Result<Vec<Entry>> {
    let output = list_raw(keystore, ListFormat::Compact, None)?;
    Ok(parse_list(&output))
}

/// Raw `-list` output in the given format, optionally for one alias.
pub fn list_raw(keystore: &mut KeyStore, format: ListFormat, alias: Option<&str>) -> Result<String> {
    let args = commands::list(format, alias, keystore.store_args()?);
    Ok(keystore.runner.run(&args, None)?.stdout)
}

/// Stream `-list` output straight into `sink`.
pub fn list_into(keystore: &mut KeyStore, format: ListFormat, sink: &mut dyn Write) -> Result<()> {
    let args = commands::list(format, None, keystore.store_args()?);
    keystore.runner.run_into(&args, None, sink)?;
    Ok(())
}

/// Verbose details of one entry.
///
/// Fails with [`KsError::MalformedAliasReference`] when the output does not
/// name the requested alias.
pub fn show_entry(keystore: &mut KeyStore, alias: &str) -> Result<String> {
    let output = list_raw(keystore, ListFormat::Verbose, Some(alias))?;
    let named = parse_verbose_aliases(&output);

    // keytool lower-cases JKS aliases, so compare without case.
    if !named.iter().any(|a| a.eq_ignore_ascii_case(alias)) {
        return Err(KsError::MalformedAliasReference(format!(
            "no 'Alias name: {}' line in keytool output",
            alias
        )));
    }
    Ok(output)
}

/// Delete one entry.
pub fn delete_entry(keystore: &mut KeyStore, alias: &str) -> Result<()> {
    let args = commands::delete(alias, keystore.store_args()?);
    keystore.runner.run(&args, None)?;
    info!(alias, "deleted entry");
    Ok(())
}

/// Delete several entries in order, stopping at the first failure.
///
/// Returns the aliases deleted. On failure the entries before the failing
/// one are already gone; re-list to see the current state.
pub fn delete_entries(keystore: &mut KeyStore, aliases: &[String]) -> Result<Vec<String>> {
    let mut deleted = Vec::with_capacity(aliases.len());
    for alias in aliases {
        delete_entry(keystore, alias)?;
        deleted.push(alias.clone());
    }
    Ok(deleted)
}

/// Import a trusted certificate from a file.
pub fn import_cert_file(keystore: &mut KeyStore, alias: &str, file: &Path) -> Result<()> {
    let args = commands::import_cert(alias, Some(file), keystore.store_args()?);
    keystore.runner.run(&args, None)?;
    info!(alias, file = %file.display(), "imported certificate");
    Ok(())
}

/// Import a trusted certificate from bytes (PEM or DER) piped to `keytool`.
pub fn import_cert_bytes(keystore: &mut KeyStore, alias: &str, certificate: &[u8]) -> Result<()> {
    let args = commands::import_cert(alias, None, keystore.store_args()?);
    keystore.runner.run(&args, Some(certificate))?;
    info!(alias, bytes = certificate.len(), "imported certificate");
    Ok(())
}

/// Rename an entry.
pub fn rename_entry(keystore: &mut KeyStore, old: &str, new: &str) -> Result<()> {
    let args = commands::change_alias(old, new, keystore.store_args()?);
    keystore.runner.run(&args, None)?;
    info!(old, new, "renamed entry");
    Ok(())
}

/// Write a certificate signing request for `alias` to `csr_out`.
pub fn cert_req(keystore: &mut KeyStore, alias: &str, csr_out: &Path) -> Result<()> {
    let args = commands::cert_req(alias, csr_out, keystore.store_args()?);
    keystore.runner.run(&args, None)?;
    info!(alias, csr = %csr_out.display(), "wrote certificate request");
    Ok(())
}

/// Sign the request in `csr_in` with the key of `alias`, writing PEM to `cert_out`.
pub fn gen_cert(keystore: &mut KeyStore, alias: &str, csr_in: &Path, cert_out: &Path) -> Result<()> {
    let args = commands::gen_cert(alias, csr_in, cert_out, keystore.store_args()?);
    keystore.runner.run(&args, None)?;
    info!(alias, csr = %csr_in.display(), cert = %cert_out.display(), "issued certificate");
    Ok(())
}

/// The certificate of `alias` as PEM.
pub fn export_cert(keystore: &mut KeyStore, alias: &str) -> Result<String> {
    let args = commands::export_cert(alias, keystore.store_args()?);
    Ok(keystore.runner.run(&args, None)?.stdout)
}

/// Generate a key pair with a self-signed certificate.
///
/// Blocks until `keytool` exits, like every other mutation.
pub fn gen_key_pair(keystore: &mut KeyStore, spec: &KeyPairSpec) -> Result<()> {
    if spec.dname.trim().is_empty() {
        return Err(KsError::Config(
            "distinguished name cannot be empty".to_string(),
        ));
    }
    let args = commands::gen_key_pair(spec, keystore.store_args()?);
    keystore.runner.run(&args, None)?;
    info!(alias = %spec.alias, keyalg = %spec.keyalg, keysize = spec.keysize, "generated key pair");
    Ok(())
}

/// Copy every entry of `source` into this store.
///
/// The source password is asked for through this store's prompter when
/// `source` has none cached.
pub fn import_keystore(keystore: &mut KeyStore, source: &mut StoreSession) -> Result<()> {
    let src = source.store_args(keystore.prompter.as_mut(), "src")?;
    let dest = keystore.session.store_args(keystore.prompter.as_mut(), "dest")?;
    let args = commands::import_keystore(src, dest);
    keystore.runner.run(&args, None)?;
    info!(
        source = %source.path().display(),
        dest = %keystore.session.path().display(),
        "imported keystore"
    );
    Ok(())
}
