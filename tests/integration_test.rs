//! Integration tests for kstab against a real `keytool`.
//!
//! These tests verify complete workflows end to end. They are skipped when
//! no `keytool` is found on `PATH`.

use kstab::config::Config;
use kstab::error::{KsError, Result};
use kstab::keytool::commands::{KeyPairSpec, ListFormat};
use kstab::prompt::ScriptedPrompter;
use kstab::storage::keystore::{
    cert_req, delete_entry, export_cert, gen_cert, gen_key_pair, import_cert_bytes,
    import_keystore, list_entries, list_raw, open_keystore, rename_entry, show_entry,
    verify_password, KeyStore,
};
use kstab::storage::session::StoreSession;
use kstab::storage::store_type::StoreType;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;
use zeroize::Zeroizing;

const PASSWORD: &str = "changeit";

fn keytool_available() -> bool {
    let found = Command::new("keytool")
        .arg("-help")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok();
    if !found {
        eprintln!("keytool not found on PATH, skipping");
    }
    found
}

fn store(path: &Path) -> KeyStore {
    let mut keystore = open_keystore(
        &Config::default(),
        path,
        None,
        Box::new(ScriptedPrompter::new(Vec::<String>::new())),
    );
    keystore
        .session_mut()
        .set_password(Zeroizing::new(PASSWORD.to_string()));
    keystore
}

fn key_pair(alias: &str, dname: &str) -> KeyPairSpec {
    KeyPairSpec {
        alias: alias.to_string(),
        keyalg: "EC".to_string(),
        keysize: 256,
        validity_days: 30,
        dname: dname.to_string(),
    }
}

fn aliases(keystore: &mut KeyStore) -> Result<Vec<String>> {
    Ok(list_entries(keystore)?.into_iter().map(|e| e.alias).collect())
}

#[test]
fn test_import_then_delete_round_trip() -> Result<()> {
    if !keytool_available() {
        return Ok(());
    }
    let temp_dir = TempDir::new().unwrap();

    // 1. Generate a key pair in a second store and export its certificate
    let mut other = store(&temp_dir.path().join("other.p12"));
    gen_key_pair(&mut other, &key_pair("peer", "CN=Peer, O=Org"))?;
    let pem = export_cert(&mut other, "peer")?;
    assert!(pem.contains("BEGIN CERTIFICATE"));

    // 2. Import it through stdin and list
    let mut keystore = store(&temp_dir.path().join("main.p12"));
    gen_key_pair(&mut keystore, &key_pair("server", "CN=Server"))?;
    import_cert_bytes(&mut keystore, "a", pem.as_bytes())?;

    let entries = list_entries(&mut keystore)?;
    let imported = entries.iter().find(|e| e.alias == "a").expect("imported entry listed");
    assert_eq!(imported.entry_type, "trustedCertEntry");
    assert!(imported.fingerprint_bytes().is_some());
    assert!(!imported.fingerprint.contains(':'));

    // 3. Delete and list again
    delete_entry(&mut keystore, "a")?;
    let remaining = aliases(&mut keystore)?;
    assert!(!remaining.contains(&"a".to_string()));
    assert!(remaining.contains(&"server".to_string()));

    Ok(())
}

#[test]
fn test_rename_and_show_workflow() -> Result<()> {
    if !keytool_available() {
        return Ok(());
    }
    let temp_dir = TempDir::new().unwrap();
    let mut keystore = store(&temp_dir.path().join("store.jks"));
    assert_eq!(keystore.session().store_type(), StoreType::Jks);

    gen_key_pair(&mut keystore, &key_pair("before", "CN=Test"))?;
    rename_entry(&mut keystore, "before", "after")?;

    assert_eq!(aliases(&mut keystore)?, vec!["after"]);

    let details = show_entry(&mut keystore, "after")?;
    assert!(details.contains("CN=Test"));

    let pem_listing = list_raw(&mut keystore, ListFormat::Rfc, None)?;
    assert!(pem_listing.contains("BEGIN CERTIFICATE"));

    Ok(())
}

#[test]
fn test_wrong_password_is_authentication_failure() -> Result<()> {
    if !keytool_available() {
        return Ok(());
    }
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.p12");
    gen_key_pair(&mut store(&path), &key_pair("k", "CN=Test"))?;

    let mut keystore = store(&path);
    keystore
        .session_mut()
        .set_password(Zeroizing::new("wrong-password".to_string()));

    match verify_password(&mut keystore) {
        Err(KsError::AuthenticationFailure(message)) => assert!(!message.is_empty()),
        other => panic!("Expected AuthenticationFailure, got {:?}", other),
    }
    assert!(!keystore.session().has_password());

    Ok(())
}

#[test]
fn test_certificate_request_workflow() -> Result<()> {
    if !keytool_available() {
        return Ok(());
    }
    let temp_dir = TempDir::new().unwrap();
    let csr = temp_dir.path().join("client.csr");
    let cert = temp_dir.path().join("client.pem");

    let mut client = store(&temp_dir.path().join("client.p12"));
    gen_key_pair(&mut client, &key_pair("client", "CN=Client"))?;
    cert_req(&mut client, "client", &csr)?;
    assert!(fs::read_to_string(&csr)?.contains("CERTIFICATE REQUEST"));

    let mut ca = store(&temp_dir.path().join("ca.p12"));
    gen_key_pair(&mut ca, &key_pair("ca", "CN=Test CA"))?;
    gen_cert(&mut ca, "ca", &csr, &cert)?;
    assert!(fs::read_to_string(&cert)?.contains("BEGIN CERTIFICATE"));

    Ok(())
}

#[test]
fn test_import_keystore_workflow() -> Result<()> {
    if !keytool_available() {
        return Ok(());
    }
    let temp_dir = TempDir::new().unwrap();
    let source_path = temp_dir.path().join("source.p12");
    gen_key_pair(&mut store(&source_path), &key_pair("moved", "CN=Moved"))?;

    let mut source = StoreSession::open(&source_path, None, StoreType::Jks)
        .with_password(Zeroizing::new(PASSWORD.to_string()));
    let mut dest = store(&temp_dir.path().join("dest.jks"));
    import_keystore(&mut dest, &mut source)?;

    assert_eq!(aliases(&mut dest)?, vec!["moved"]);

    Ok(())
}
