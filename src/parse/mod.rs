//! Output parsing module.
//!
//! Turns the semi-structured text `keytool` prints into table rows or a
//! single alias.

pub mod alias;
pub mod listing;

/// Whether a value is absent, empty or only whitespace.
///
/// # Example
///
/// ```
/// use kstab::parse::is_blank;
///
/// assert!(is_blank(None));
/// assert!(is_blank(Some(" \t")));
/// assert!(!is_blank(Some("Org")));
/// ```
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
