//! Entry rows as shown in the store table.

use serde::Serialize;

/// One row of a store listing.
///
/// Rows are rebuilt from `keytool -list` after every mutation; nothing here
/// is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// 1-based position in the listing.
    pub id: usize,

    /// The alias naming this entry. Used to target every per-entry operation.
    pub alias: String,

    /// Entry kind as reported by keytool, e.g. `PrivateKeyEntry`.
    pub entry_type: String,

    /// Certificate fingerprint as bare hex (separators removed).
    pub fingerprint: String,
}

impl Entry {
    /// Create a new row.
    pub fn new(id: usize, alias: String, entry_type: String, fingerprint: String) -> Self {
        Self {
            id,
            alias,
            entry_type,
            fingerprint,
        }
    }

    /// The fingerprint decoded to raw bytes, if it is well-formed hex.
    pub fn fingerprint_bytes(&self) -> Option<Vec<u8>> {
        hex::decode(&self.fingerprint).ok()
    }
}

/// Column titles, in table order.
const COLUMNS: [&str; 4] = ["Alias", "Type", "Fingerprint", "Id"];

/// Render rows as a fixed-width table.
///
/// Every row starts with `alias,` like a compact `keytool` record, so rows
/// copied out of the table can be fed back to
/// [`aliases_from_lines`](crate::parse::alias::aliases_from_lines).
pub fn format_table(entries: &[Entry]) -> String {
    let alias_width = column_width(COLUMNS[0], entries.iter().map(|e| e.alias.as_str()));
    let type_width = column_width(COLUMNS[1], entries.iter().map(|e| e.entry_type.as_str()));
    let fingerprint_width =
        column_width(COLUMNS[2], entries.iter().map(|e| e.fingerprint.as_str()));

    let row = |alias: &str, kind: &str, fingerprint: &str, id: &str| {
        format!(
            "{:<aw$}  {:<tw$}  {:<fw$}  {}\n",
            format!("{},", alias),
            format!("{},", kind),
            format!("{},", fingerprint),
            id,
            aw = alias_width,
            tw = type_width,
            fw = fingerprint_width
        )
    };

    let mut out = row(COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3]);
    out.push_str(&"-".repeat(alias_width + type_width + fingerprint_width + 6 + COLUMNS[3].len()));
    out.push('\n');

    for entry in entries {
        out.push_str(&row(
            &entry.alias,
            &entry.entry_type,
            &entry.fingerprint,
            &entry.id.to_string(),
        ));
    }

    out
}

/// Widest cell of a column, counting its trailing comma.
fn column_width<'a>(title: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(str::len).max().unwrap_or(0).max(title.len()) + 1
}

/// Whether `line` is the header or the rule line of [`format_table`] output.
pub fn is_table_decoration(line: &str) -> bool {
    let line = line.trim();
    if !line.is_empty() && line.chars().all(|c| c == '-') {
        return true;
    }
    line.split(',').map(str::trim).eq(COLUMNS)
}
