//! Argument vectors with nested groups.
//!
//! Command builders splice whole groups (such as the store flag triple) into
//! an argument list; [`flatten`] turns the result into the flat vector handed
//! to the child process.

use std::path::Path;

/// Flags whose following value is a secret.
const SECRET_FLAG_SUFFIXES: [&str; 2] = ["storepass", "keypass"];

/// One command-line argument or an ordered group of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    One(String),
    Group(Vec<Arg>),
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::One(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::One(value)
    }
}

impl From<&Path> for Arg {
    fn from(value: &Path) -> Self {
        Arg::One(value.to_string_lossy().into_owned())
    }
}

impl From<Vec<String>> for Arg {
    fn from(values: Vec<String>) -> Self {
        Arg::Group(values.into_iter().map(Arg::One).collect())
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(values: Vec<Arg>) -> Self {
        Arg::Group(values)
    }
}

/// Flatten nested groups depth-first, preserving order.
pub fn flatten(args: &[Arg]) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    push_flat(args, &mut out);
    out
}

fn push_flat(args: &[Arg], out: &mut Vec<String>) {
    for arg in args {
        match arg {
            Arg::One(value) => out.push(value.clone()),
            Arg::Group(group) => push_flat(group, out),
        }
    }
}

/// Copy of `argv` with the values of password flags replaced, for logging.
pub fn masked(argv: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(argv.len());
    let mut hide_next = false;

    for arg in argv {
        if hide_next {
            out.push("****".to_string());
            hide_next = false;
            continue;
        }
        hide_next = arg.starts_with('-')
            && SECRET_FLAG_SUFFIXES
                .iter()
                .any(|suffix| arg.ends_with(suffix));
        out.push(arg.clone());
    }

    out
}
