//! Distinguished-name assembly for `-genkeypair -dname`.

use crate::error::Result;
use crate::parse::is_blank;
use crate::prompt::Prompter;

/// Builder for an X.500 distinguished name.
///
/// Components are emitted in the fixed order CN, OU, O, L, S, C regardless of
/// the order they were set in. Blank components are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnameBuilder {
    common_name: Option<String>,
    organizational_unit: Option<String>,
    organization: Option<String>,
    locality: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl DnameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn common_name(mut self, value: impl Into<String>) -> Self {
        self.common_name = Some(value.into());
        self
    }

    pub fn organizational_unit(mut self, value: impl Into<String>) -> Self {
        self.organizational_unit = Some(value.into());
        self
    }

    pub fn organization(mut self, value: impl Into<String>) -> Self {
        self.organization = Some(value.into());
        self
    }

    pub fn locality(mut self, value: impl Into<String>) -> Self {
        self.locality = Some(value.into());
        self
    }

    pub fn state(mut self, value: impl Into<String>) -> Self {
        self.state = Some(value.into());
        self
    }

    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.country = Some(value.into());
        self
    }

    fn components(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("CN", self.common_name.as_deref()),
            ("OU", self.organizational_unit.as_deref()),
            ("O", self.organization.as_deref()),
            ("L", self.locality.as_deref()),
            ("S", self.state.as_deref()),
            ("C", self.country.as_deref()),
        ]
    }

    /// Whether every component is blank.
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(|(_, value)| is_blank(*value))
    }

    /// Join the non-blank components as `KEY=value, KEY=value`.
    ///
    /// # Example
    ///
    /// ```
    /// use kstab::cert::dname::DnameBuilder;
    ///
    /// let dn = DnameBuilder::new().organization("Org").common_name("Test").build();
    /// assert_eq!(dn, "CN=Test, O=Org");
    /// ```
    pub fn build(&self) -> String {
        self.components()
            .iter()
            .filter(|(_, value)| !is_blank(*value))
            .map(|(key, value)| format!("{}={}", key, value.unwrap_or_default().trim()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Ask for each DN component in turn.
///
/// Values from `previous` are offered as defaults, so a retry after a failed
/// generation does not make the user type everything again.
pub fn prompt_dname(
    prompter: &mut dyn Prompter,
    previous: Option<&DnameBuilder>,
) -> Result<DnameBuilder> {
    let previous = previous.cloned().unwrap_or_default();
    let mut ask = |label: &str, default: Option<&str>| -> Result<Option<String>> {
        let answer = prompter.line(label, default)?;
        Ok((!is_blank(Some(answer.as_str()))).then_some(answer))
    };

    Ok(DnameBuilder {
        common_name: ask("Common name (CN)", previous.common_name.as_deref())?,
        organizational_unit: ask(
            "Organizational unit (OU)",
            previous.organizational_unit.as_deref(),
        )?,
        organization: ask("Organization (O)", previous.organization.as_deref())?,
        locality: ask("Locality (L)", previous.locality.as_deref())?,
        state: ask("State (S)", previous.state.as_deref())?,
        country: ask("Country (C)", previous.country.as_deref())?,
    })
}
