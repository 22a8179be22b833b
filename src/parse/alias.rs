//! Extracting a target alias from one line of output.

use crate::error::{KsError, Result};
use crate::parse::listing::{join_wrapped_records, ALIAS_LABEL};
use crate::storage::metadata::is_table_decoration;

/// Extract the alias named by a single line.
///
/// A line starting with `Alias name: ` names everything after the label.
/// Otherwise a compact record names the text before its first comma. A line
/// with neither shape carries no alias and yields
/// [`KsError::MalformedAliasReference`].
///
/// # Example
///
/// ```
/// use kstab::parse::alias::extract_alias;
///
/// assert_eq!(extract_alias("Alias name: server").unwrap(), "server");
/// assert_eq!(extract_alias("ca, Jan 1, 2020, trustedCertEntry, x").unwrap(), "ca");
/// assert!(extract_alias("Keystore type: JKS").is_err());
/// ```
pub fn extract_alias(line: &str) -> Result<String> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(alias) = line.strip_prefix(ALIAS_LABEL) {
        return non_empty(alias, line);
    }

    match line.split_once(',') {
        Some((alias, _)) => non_empty(alias.trim(), line),
        None => Err(KsError::MalformedAliasReference(line.to_string())),
    }
}

/// Extract one alias per record, e.g. from marked table rows.
///
/// Accepts rows printed by [`format_table`](crate::storage::metadata::format_table)
/// (its header and rule lines are skipped) as well as `keytool -list`
/// records whose fingerprint wrapped onto the next line. Any other line
/// without an alias fails the whole batch, so a partially understood
/// selection is never acted on.
pub fn aliases_from_lines(text: &str) -> Result<Vec<String>> {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty() && !is_table_decoration(line))
        .collect();

    join_wrapped_records(&lines)
        .iter()
        .map(|record| extract_alias(record))
        .collect()
}

fn non_empty(alias: &str, line: &str) -> Result<String> {
    if alias.is_empty() {
        return Err(KsError::MalformedAliasReference(line.to_string()));
    }
    Ok(alias.to_string())
}
