//! Parsing of `keytool -list` output.
//!
//! The compact listing prints one record per entry:
//!
//! ```text
//! mykey, Jan 1, 2020, PrivateKeyEntry,
//! Certificate fingerprint (SHA-256): AB:CD:EF:01
//! ```
//!
//! Newer `keytool` releases wrap the fingerprint onto its own line as above,
//! older ones keep the record on a single line. Both shapes are accepted.

use crate::storage::metadata::Entry;

/// Number of comma-separated fields in an entry record.
const RECORD_FIELDS: usize = 5;

/// Label that introduces the alias in verbose (`-v`) output.
pub const ALIAS_LABEL: &str = "Alias name: ";

/// Parse a compact listing into rows.
///
/// Lines that do not split into exactly five comma-separated fields (banners,
/// the entry count, warnings) are skipped without error. Rows are numbered
/// from 1 and returned in the order `keytool` printed them.
///
/// # Example
///
/// ```
/// use kstab::parse::listing::parse_list;
///
/// let rows = parse_list(
///     "mykey, Jan 1, 2020, PrivateKeyEntry, Certificate fingerprint (SHA-256): AB:CD:EF:01",
/// );
/// assert_eq!(rows[0].alias, "mykey");
/// assert_eq!(rows[0].fingerprint, "ABCDEF01");
/// ```
pub fn parse_list(output: &str) -> Vec<Entry> {
    let mut entries = Vec::new();

    for block in split_blocks(output) {
        for record in join_wrapped_records(&block) {
            let fields: Vec<&str> = record.split(',').map(str::trim).collect();
            if fields.len() != RECORD_FIELDS {
                continue;
            }

            entries.push(Entry::new(
                entries.len() + 1,
                fields[0].to_string(),
                fields[3].to_string(),
                normalize_fingerprint(fields[4]),
            ));
        }
    }

    entries
}

/// Aliases named by `Alias name: ` lines of a verbose listing, in order.
pub fn parse_verbose_aliases(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim_end().strip_prefix(ALIAS_LABEL))
        .map(str::to_string)
        .collect()
}

/// Strip the algorithm label and the `:` separators from a fingerprint field.
///
/// `"Certificate fingerprint (SHA-256): AB:CD"` becomes `"ABCD"`.
pub fn normalize_fingerprint(field: &str) -> String {
    let digest = field
        .split_once(": ")
        .map(|(_, value)| value)
        .unwrap_or(field);
    digest.trim().replace(':', "")
}

/// Split on blank lines, treating any run of blank lines as one separator.
fn split_blocks(output: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Rejoin records whose fingerprint was wrapped onto the following line.
pub(crate) fn join_wrapped_records(lines: &[&str]) -> Vec<String> {
    let mut records = Vec::with_capacity(lines.len());
    let mut pending: Option<String> = None;

    for line in lines {
        let line = line.trim();
        let joined = match pending.take() {
            Some(mut head) => {
                head.push(' ');
                head.push_str(line);
                head
            }
            None => line.to_string(),
        };

        if joined.ends_with(',') {
            pending = Some(joined);
        } else {
            records.push(joined);
        }
    }
    records.extend(pending);

    records
}
