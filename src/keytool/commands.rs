//! Argument builders for each `keytool` operation.
//!
//! Every builder takes the already resolved store flag triple(s) (see
//! [`crate::storage::session::store_args`]) and returns the argument list to
//! hand to [`crate::keytool::runner::KeytoolRunner`].

use crate::keytool::args::Arg;
use std::path::Path;

/// Output style of `-list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFormat {
    /// One comma-separated record per entry; the only parseable form.
    #[default]
    Compact,
    /// `-v`: every field of every certificate.
    Verbose,
    /// `-rfc`: certificates as PEM.
    Rfc,
}

/// Parameters of `-genkeypair`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairSpec {
    pub alias: String,
    pub keyalg: String,
    pub keysize: u32,
    pub validity_days: u32,
    pub dname: String,
}

/// `-list [-v|-rfc] [-alias <alias>] {store}`
pub fn list(format: ListFormat, alias: Option<&str>, store: Vec<String>) -> Vec<Arg> {
    let mut args = vec![Arg::from("-list")];
    match format {
        ListFormat::Compact => {}
        ListFormat::Verbose => args.push(Arg::from("-v")),
        ListFormat::Rfc => args.push(Arg::from("-rfc")),
    }
    if let Some(alias) = alias {
        args.push(Arg::from("-alias"));
        args.push(Arg::from(alias));
    }
    args.push(Arg::from(store));
    args
}

/// `-delete -alias <alias> {store}`
pub fn delete(alias: &str, store: Vec<String>) -> Vec<Arg> {
    vec![
        Arg::from("-delete"),
        Arg::from("-alias"),
        Arg::from(alias),
        Arg::from(store),
    ]
}

/// `-importcert -alias <alias> [-file <path>] -noprompt {store}`
///
/// Without `file` the certificate is read from stdin.
pub fn import_cert(alias: &str, file: Option<&Path>, store: Vec<String>) -> Vec<Arg> {
    let mut args = vec![Arg::from("-importcert"), Arg::from("-alias"), Arg::from(alias)];
    if let Some(file) = file {
        args.push(Arg::from("-file"));
        args.push(Arg::from(file));
    }
    args.push(Arg::from("-noprompt"));
    args.push(Arg::from(store));
    args
}

/// `-changealias -alias <old> -destalias <new> {store}`
pub fn change_alias(old: &str, new: &str, store: Vec<String>) -> Vec<Arg> {
    vec![
        Arg::from("-changealias"),
        Arg::from("-alias"),
        Arg::from(old),
        Arg::from("-destalias"),
        Arg::from(new),
        Arg::from(store),
    ]
}

/// `-certreq -alias <alias> -file <csr_out> {store}`
pub fn cert_req(alias: &str, csr_out: &Path, store: Vec<String>) -> Vec<Arg> {
    vec![
        Arg::from("-certreq"),
        Arg::from("-alias"),
        Arg::from(alias),
        Arg::from("-file"),
        Arg::from(csr_out),
        Arg::from(store),
    ]
}

/// `-gencert -alias <alias> -infile <csr_in> -outfile <cert_out> -rfc {store}`
pub fn gen_cert(alias: &str, csr_in: &Path, cert_out: &Path, store: Vec<String>) -> Vec<Arg> {
    vec![
        Arg::from("-gencert"),
        Arg::from("-alias"),
        Arg::from(alias),
        Arg::from("-infile"),
        Arg::from(csr_in),
        Arg::from("-outfile"),
        Arg::from(cert_out),
        Arg::from("-rfc"),
        Arg::from(store),
    ]
}

/// `-exportcert -alias <alias> -rfc {store}`
pub fn export_cert(alias: &str, store: Vec<String>) -> Vec<Arg> {
    vec![
        Arg::from("-exportcert"),
        Arg::from("-alias"),
        Arg::from(alias),
        Arg::from("-rfc"),
        Arg::from(store),
    ]
}

/// `-genkeypair -keyalg <alg> -keysize <n> -validity <days> -alias <alias> -dname <dn> {store}`
pub fn gen_key_pair(spec: &KeyPairSpec, store: Vec<String>) -> Vec<Arg> {
    vec![
        Arg::from("-genkeypair"),
        Arg::from("-keyalg"),
        Arg::from(spec.keyalg.as_str()),
        Arg::from("-keysize"),
        Arg::from(spec.keysize.to_string()),
        Arg::from("-validity"),
        Arg::from(spec.validity_days.to_string()),
        Arg::from("-alias"),
        Arg::from(spec.alias.as_str()),
        Arg::from("-dname"),
        Arg::from(spec.dname.as_str()),
        Arg::from(store),
    ]
}

/// `-importkeystore {src} {dest} -noprompt`
///
/// `src` must carry the `src` prefix and `dest` the `dest` prefix.
pub fn import_keystore(src: Vec<String>, dest: Vec<String>) -> Vec<Arg> {
    vec![
        Arg::from("-importkeystore"),
        Arg::from(src),
        Arg::from(dest),
        Arg::from("-noprompt"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keytool::args::flatten;
    use crate::storage::session::store_args;
    use crate::storage::store_type::StoreType;

    fn store() -> Vec<String> {
        store_args("", Path::new("s.jks"), "pw", StoreType::Jks)
    }

    const STORE: [&str; 6] = ["-keystore", "s.jks", "-storepass", "pw", "-storetype", "JKS"];

    fn with_store(head: &[&str]) -> Vec<String> {
        head.iter().chain(STORE.iter()).map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_list_formats() {
        assert_eq!(flatten(&list(ListFormat::Compact, None, store())), with_store(&["-list"]));
        assert_eq!(
            flatten(&list(ListFormat::Verbose, None, store())),
            with_store(&["-list", "-v"])
        );
        assert_eq!(
            flatten(&list(ListFormat::Rfc, Some("a"), store())),
            with_store(&["-list", "-rfc", "-alias", "a"])
        );
    }

    #[test]
    fn test_delete() {
        assert_eq!(
            flatten(&delete("old", store())),
            with_store(&["-delete", "-alias", "old"])
        );
    }

    #[test]
    fn test_import_cert_with_and_without_file() {
        assert_eq!(
            flatten(&import_cert("ca", Some(Path::new("ca.pem")), store())),
            with_store(&["-importcert", "-alias", "ca", "-file", "ca.pem", "-noprompt"])
        );
        assert_eq!(
            flatten(&import_cert("ca", None, store())),
            with_store(&["-importcert", "-alias", "ca", "-noprompt"])
        );
    }

    #[test]
    fn test_change_alias() {
        assert_eq!(
            flatten(&change_alias("a", "b", store())),
            with_store(&["-changealias", "-alias", "a", "-destalias", "b"])
        );
    }

    #[test]
    fn test_cert_req_and_gen_cert() {
        assert_eq!(
            flatten(&cert_req("k", Path::new("k.csr"), store())),
            with_store(&["-certreq", "-alias", "k", "-file", "k.csr"])
        );
        assert_eq!(
            flatten(&gen_cert("ca", Path::new("in.csr"), Path::new("out.pem"), store())),
            with_store(&[
                "-gencert", "-alias", "ca", "-infile", "in.csr", "-outfile", "out.pem", "-rfc"
            ])
        );
    }

    #[test]
    fn test_export_cert() {
        assert_eq!(
            flatten(&export_cert("k", store())),
            with_store(&["-exportcert", "-alias", "k", "-rfc"])
        );
    }

    #[test]
    fn test_gen_key_pair() {
        let spec = KeyPairSpec {
            alias: "server".to_string(),
            keyalg: "EC".to_string(),
            keysize: 256,
            validity_days: 30,
            dname: "CN=Test, O=Org".to_string(),
        };
        assert_eq!(
            flatten(&gen_key_pair(&spec, store())),
            with_store(&[
                "-genkeypair", "-keyalg", "EC", "-keysize", "256", "-validity", "30", "-alias",
                "server", "-dname", "CN=Test, O=Org"
            ])
        );
    }

    #[test]
    fn test_import_keystore() {
        let src = store_args("src", Path::new("a.p12"), "x", StoreType::Pkcs12);
        let dest = store_args("dest", Path::new("b.jks"), "y", StoreType::Jks);
        let argv = flatten(&import_keystore(src, dest));
        assert_eq!(
            argv,
            vec![
                "-importkeystore",
                "-srckeystore",
                "a.p12",
                "-srcstorepass",
                "x",
                "-srcstoretype",
                "PKCS12",
                "-destkeystore",
                "b.jks",
                "-deststorepass",
                "y",
                "-deststoretype",
                "JKS",
                "-noprompt",
            ]
        );
    }
}
