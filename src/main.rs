//! kstab CLI application.
//!
//! This binary lists and edits JKS/PKCS12 key stores by driving `keytool`.
//! Every command that changes the store prints the refreshed table.

use clap::{Args, Parser, Subcommand};
use kstab::cert::dname::{prompt_dname, DnameBuilder};
use kstab::config::{Config, DEFAULT_KEYALG, DEFAULT_KEYSIZE, DEFAULT_VALIDITY_DAYS};
use kstab::error::{KsError, Result};
use kstab::keytool::commands::{KeyPairSpec, ListFormat};
use kstab::parse::alias::aliases_from_lines;
use kstab::prompt::TerminalPrompter;
use kstab::storage::keystore::{
    cert_req, delete_entries, export_cert, gen_cert, gen_key_pair, import_cert_bytes,
    import_cert_file, import_keystore, list_entries, list_into, open_keystore, rename_entry,
    show_entry, unlock, unlock_or_create, KeyStore,
};
use kstab::storage::metadata::format_table;
use kstab::storage::session::StoreSession;
use kstab::storage::store_type::StoreType;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

/// Attempts allowed for interactive password entry before giving up.
const PASSWORD_ATTEMPTS: usize = 3;

#[derive(Parser)]
#[command(name = "kstab")]
#[command(version, about = "Tabular keystore manager driving keytool", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Key store file to operate on
    #[arg(short, long, global = true, env = "KSTAB_STORE")]
    store: Option<PathBuf>,

    /// Store type, overriding inference from the file extension
    #[arg(long, global = true)]
    store_type: Option<StoreType>,

    /// Store type used when the extension is not .jks, .p12 or .pkcs12
    #[arg(long, global = true, env = "KSTAB_DEFAULT_STORE_TYPE", default_value = "JKS")]
    default_store_type: StoreType,

    /// Store password (prompted when absent)
    #[arg(long, global = true, env = "KSTAB_STOREPASS", hide_env_values = true)]
    storepass: Option<String>,

    /// keytool executable
    #[arg(long, global = true, env = "KSTAB_KEYTOOL", default_value = "keytool")]
    keytool: PathBuf,

    /// Kill keytool after this many seconds (0 = wait forever)
    #[arg(long, global = true, env = "KSTAB_TIMEOUT", default_value = "0")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entries of the store
    List {
        /// Full details of every entry (keytool -v)
        #[arg(short, long, conflicts_with = "rfc")]
        verbose: bool,

        /// Certificates as PEM (keytool -rfc)
        #[arg(long)]
        rfc: bool,

        /// Table rows as JSON
        #[arg(long, conflicts_with_all = ["verbose", "rfc"])]
        json: bool,
    },

    /// Show the details of one entry
    Show {
        /// Alias of the entry
        alias: String,
    },

    /// Delete one or more entries
    Delete {
        /// Aliases to delete
        aliases: Vec<String>,

        /// Read table rows or keytool records naming the entries from a file ("-" for stdin)
        #[arg(long)]
        from: Option<PathBuf>,
    },

    /// Import a trusted certificate
    ImportCert {
        /// Alias for the new entry
        alias: String,

        /// Certificate file (PEM or DER); read from stdin when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Rename an entry
    Rename {
        /// Current alias
        old: String,

        /// New alias
        new: String,
    },

    /// Write a certificate signing request for a key entry
    Certreq {
        /// Alias of the key entry
        alias: String,

        /// Output CSR file
        output: PathBuf,
    },

    /// Issue a certificate from a CSR, signed by a key entry
    Gencert {
        /// Alias of the signing key entry
        alias: String,

        /// Input CSR file
        infile: PathBuf,

        /// Output certificate file (PEM)
        outfile: PathBuf,
    },

    /// Export the certificate of an entry as PEM
    Export {
        /// Alias of the entry
        alias: String,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate a key pair with a self-signed certificate
    Genkeypair(GenKeyPairArgs),

    /// Copy all entries of another store into this one
    ImportKeystore {
        /// Source store file
        source: PathBuf,

        /// Source store type, overriding inference
        #[arg(long)]
        src_type: Option<StoreType>,

        /// Source store password (prompted when absent)
        #[arg(long, env = "KSTAB_SRCSTOREPASS", hide_env_values = true)]
        srcstorepass: Option<String>,
    },

    /// Check the store password
    CheckPassword,
}

#[derive(Args)]
struct GenKeyPairArgs {
    /// Alias for the new entry
    alias: String,

    /// Key algorithm
    #[arg(long, default_value = DEFAULT_KEYALG)]
    keyalg: String,

    /// Key size in bits
    #[arg(long, default_value_t = DEFAULT_KEYSIZE)]
    keysize: u32,

    /// Certificate validity in days
    #[arg(long, default_value_t = DEFAULT_VALIDITY_DAYS)]
    validity: u32,

    /// Complete distinguished name; overrides the component flags
    #[arg(long)]
    dname: Option<String>,

    /// Common name (CN)
    #[arg(long)]
    cn: Option<String>,

    /// Organizational unit (OU)
    #[arg(long)]
    ou: Option<String>,

    /// Organization (O)
    #[arg(long)]
    org: Option<String>,

    /// Locality (L)
    #[arg(long)]
    locality: Option<String>,

    /// State (S)
    #[arg(long)]
    state: Option<String>,

    /// Country (C)
    #[arg(long)]
    country: Option<String>,
}

impl GenKeyPairArgs {
    fn dname_builder(&self) -> DnameBuilder {
        let mut builder = DnameBuilder::new();
        if let Some(v) = &self.cn {
            builder = builder.common_name(v);
        }
        if let Some(v) = &self.ou {
            builder = builder.organizational_unit(v);
        }
        if let Some(v) = &self.org {
            builder = builder.organization(v);
        }
        if let Some(v) = &self.locality {
            builder = builder.locality(v);
        }
        if let Some(v) = &self.state {
            builder = builder.state(v);
        }
        if let Some(v) = &self.country {
            builder = builder.country(v);
        }
        builder
    }
}

fn main() {
    // RUST_LOG=kstab=debug shows every keytool invocation with passwords masked.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kstab=warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    let mut config = Config {
        keytool: global.keytool.clone(),
        default_store_type: global.default_store_type,
        ..Config::default()
    }
    .with_timeout_secs(global.timeout);

    if let Commands::Genkeypair(args) = &cli.command {
        config.keyalg = args.keyalg.clone();
        config.keysize = args.keysize;
        config.validity_days = args.validity;
    }
    config.validate()?;

    let path = global
        .store
        .clone()
        .ok_or_else(|| KsError::Config("no key store given; use --store or KSTAB_STORE".to_string()))?;

    let mut keystore = open_keystore(&config, &path, global.store_type, Box::new(TerminalPrompter));
    let password_given = global.storepass.is_some();
    if let Some(password) = global.storepass {
        keystore.session_mut().set_password(Zeroizing::new(password));
    }

    match cli.command {
        Commands::List { verbose, rfc, json } => {
            unlock_with_retry(&mut keystore, password_given, false)?;
            if verbose || rfc {
                let format = if verbose {
                    ListFormat::Verbose
                } else {
                    ListFormat::Rfc
                };
                list_into(&mut keystore, format, &mut io::stdout())
            } else {
                print_entries(&mut keystore, json)
            }
        }

        Commands::Show { alias } => {
            unlock_with_retry(&mut keystore, password_given, false)?;
            print!("{}", show_entry(&mut keystore, &alias)?);
            Ok(())
        }

        Commands::Delete { aliases, from } => {
            let mut targets = aliases;
            if let Some(from) = from {
                targets.extend(aliases_from_lines(&read_input(&from)?)?);
            }
            if targets.is_empty() {
                return Err(KsError::Config("nothing to delete".to_string()));
            }
            unlock_with_retry(&mut keystore, password_given, false)?;
            let deleted = delete_entries(&mut keystore, &targets)?;
            println!("Deleted {} entr{}", deleted.len(), if deleted.len() == 1 { "y" } else { "ies" });
            print_entries(&mut keystore, false)
        }

        Commands::ImportCert { alias, file } => {
            match file {
                Some(file) => {
                    unlock_with_retry(&mut keystore, password_given, true)?;
                    import_cert_file(&mut keystore, &alias, &file)?;
                }
                None => {
                    // Drain stdin before prompting so the certificate is never read as input.
                    let mut certificate = Vec::new();
                    io::stdin().read_to_end(&mut certificate)?;
                    unlock_with_retry(&mut keystore, password_given, true)?;
                    import_cert_bytes(&mut keystore, &alias, &certificate)?;
                }
            }
            println!("Imported certificate as '{}'", alias);
            print_entries(&mut keystore, false)
        }

        Commands::Rename { old, new } => {
            unlock_with_retry(&mut keystore, password_given, false)?;
            rename_entry(&mut keystore, &old, &new)?;
            println!("Renamed '{}' to '{}'", old, new);
            print_entries(&mut keystore, false)
        }

        Commands::Certreq { alias, output } => {
            unlock_with_retry(&mut keystore, password_given, false)?;
            cert_req(&mut keystore, &alias, &output)?;
            println!("✓ Wrote certificate request: {}", output.display());
            Ok(())
        }

        Commands::Gencert {
            alias,
            infile,
            outfile,
        } => {
            unlock_with_retry(&mut keystore, password_given, false)?;
            gen_cert(&mut keystore, &alias, &infile, &outfile)?;
            println!("✓ Issued certificate: {}", outfile.display());
            println!("  Signed by: {}", alias);
            Ok(())
        }

        Commands::Export { alias, output } => {
            unlock_with_retry(&mut keystore, password_given, false)?;
            let pem = export_cert(&mut keystore, &alias)?;
            match output {
                Some(output) => {
                    fs::write(&output, pem.as_bytes())?;
                    println!("Exported '{}' to: {}", alias, output.display());
                }
                None => print!("{}", pem),
            }
            Ok(())
        }

        Commands::Genkeypair(args) => {
            unlock_with_retry(&mut keystore, password_given, true)?;
            handle_genkeypair(&mut keystore, &config, &args)?;
            print_entries(&mut keystore, false)
        }

        Commands::ImportKeystore {
            source,
            src_type,
            srcstorepass,
        } => {
            let mut source_session = StoreSession::open(&source, src_type, config.default_store_type);
            if let Some(password) = srcstorepass {
                source_session.set_password(Zeroizing::new(password));
            }
            unlock_with_retry(&mut keystore, password_given, true)?;
            import_keystore(&mut keystore, &mut source_session)?;
            println!("Imported entries from: {}", source.display());
            print_entries(&mut keystore, false)
        }

        Commands::CheckPassword => {
            unlock_with_retry(&mut keystore, password_given, false)?;
            println!("✓ Password accepted for {}", path.display());
            Ok(())
        }
    }
}

/// Unlock the store, re-prompting on a wrong or mistyped password.
///
/// With `create`, a missing store gets a new password instead of an error.
/// A password passed on the command line is not retried.
fn unlock_with_retry(keystore: &mut KeyStore, password_given: bool, create: bool) -> Result<()> {
    let attempts = if password_given { 1 } else { PASSWORD_ATTEMPTS };
    let mut last_error = None;

    for _ in 0..attempts {
        let unlocked = if create {
            unlock_or_create(keystore)
        } else {
            unlock(keystore)
        };
        match unlocked {
            Ok(()) => return Ok(()),
            Err(e @ (KsError::AuthenticationFailure(_) | KsError::PasswordMismatch)) => {
                eprintln!("{}", e);
                keystore.session_mut().forget_password();
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or(KsError::PasswordMismatch))
}

fn handle_genkeypair(keystore: &mut KeyStore, config: &Config, args: &GenKeyPairArgs) -> Result<()> {
    let mut spec = KeyPairSpec {
        alias: args.alias.clone(),
        keyalg: config.keyalg.clone(),
        keysize: config.keysize,
        validity_days: config.validity_days,
        dname: String::new(),
    };

    if let Some(dname) = &args.dname {
        spec.dname = dname.clone();
        return gen_key_pair(keystore, &spec);
    }

    let from_flags = args.dname_builder();
    if !from_flags.is_empty() {
        spec.dname = from_flags.build();
        return gen_key_pair(keystore, &spec);
    }

    // Interactive: keep the previous answers as defaults on each retry.
    let mut previous: Option<DnameBuilder> = None;
    loop {
        let builder = prompt_dname(keystore.prompter(), previous.as_ref())?;
        spec.dname = builder.build();

        match gen_key_pair(keystore, &spec) {
            Ok(()) => {
                println!("✓ Generated key pair '{}'", spec.alias);
                println!("  Subject: {}", spec.dname);
                return Ok(());
            }
            Err(e @ (KsError::InvocationFailure { .. } | KsError::Config(_))) => {
                eprintln!("{}", e);
                let again = keystore.prompter().line("Try again? (y/N)", Some("n"))?;
                if !again.trim().eq_ignore_ascii_case("y") {
                    return Err(e);
                }
                previous = Some(builder);
            }
            Err(e) => return Err(e),
        }
    }
}

fn print_entries(keystore: &mut KeyStore, json: bool) -> Result<()> {
    let entries = list_entries(keystore)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("No entries found in {}.", keystore.session().path().display());
    } else {
        print!("{}", format_table(&entries));
    }

    Ok(())
}

/// Read a whole file, or stdin for "-".
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(fs::read_to_string(path)?)
}
