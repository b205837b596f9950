use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::fold_name;

/// Comparison strictness requested by a check. Its meaning belongs to the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssertionMode {
    #[default]
    Default,
    NonStrict,
    NonStrictUnordered,
    NoValue,
    NonStrictUnorderedAndNoValue,
}

impl AssertionMode {
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::NonStrict,
        Self::NonStrictUnordered,
        Self::NoValue,
        Self::NonStrictUnorderedAndNoValue,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::NonStrict => "NON_STRICT",
            Self::NonStrictUnordered => "NON_STRICT_UNORDERED",
            Self::NoValue => "NO_VALUE",
            Self::NonStrictUnorderedAndNoValue => "NON_STRICT_UNORDERED_AND_NO_VALUE",
        }
    }
}

impl fmt::Display for AssertionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown assertion mode `{0}`")]
pub struct UnknownAssertionMode(pub String);

impl FromStr for AssertionMode {
    type Err = UnknownAssertionMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| UnknownAssertionMode(value.to_string()))
    }
}

/// Where the expected dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DatasetLocation {
    /// Derived by the loader from the test's naming convention.
    #[default]
    Convention,
    Path(String),
}

impl DatasetLocation {
    /// An empty or blank string selects the convention default.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Convention
        } else {
            Self::Path(trimmed.to_string())
        }
    }
}

impl fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convention => f.write_str("<convention>"),
            Self::Path(path) => f.write_str(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModifierId(String);

impl ModifierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModifierId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One expected-state declaration, as supplied by a single configuration scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationSpec {
    location: DatasetLocation,
    assertion_mode: AssertionMode,
    table: Option<String>,
    query: Option<String>,
    overrides: bool,
    modifiers: Vec<ModifierId>,
}

impl Default for ExpectationSpec {
    fn default() -> Self {
        Self {
            location: DatasetLocation::Convention,
            assertion_mode: AssertionMode::Default,
            table: None,
            query: None,
            overrides: true,
            modifiers: Vec::new(),
        }
    }
}

impl ExpectationSpec {
    #[must_use]
    pub fn new(location: DatasetLocation) -> Self {
        Self {
            location,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_assertion_mode(mut self, mode: AssertionMode) -> Self {
        self.assertion_mode = mode;
        self
    }

    /// Blank table names are treated as unset.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = non_blank(table.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = non_blank(query.into());
        self
    }

    #[must_use]
    pub fn with_override(mut self, overrides: bool) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_modifiers<I, M>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<ModifierId>,
    {
        self.modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn location(&self) -> &DatasetLocation {
        &self.location
    }

    #[must_use]
    pub fn assertion_mode(&self) -> AssertionMode {
        self.assertion_mode
    }

    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[must_use]
    pub fn overrides(&self) -> bool {
        self.overrides
    }

    #[must_use]
    pub fn modifiers(&self) -> &[ModifierId] {
        &self.modifiers
    }

    #[must_use]
    pub fn targets_table(&self, table: &str) -> bool {
        self.table
            .as_deref()
            .is_some_and(|own| fold_name(own) == fold_name(table))
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{AssertionMode, DatasetLocation, ExpectationSpec};

    #[test]
    fn assertion_mode_parses_upper_snake_names() {
        for mode in AssertionMode::ALL {
            assert_eq!(mode.as_str().parse::<AssertionMode>(), Ok(mode));
        }
        assert_eq!(
            "non_strict_unordered".parse::<AssertionMode>(),
            Ok(AssertionMode::NonStrictUnordered)
        );
        assert!("LENIENT".parse::<AssertionMode>().is_err());
    }

    #[test]
    fn defaults_match_declaration_defaults() {
        let spec = ExpectationSpec::default();

        assert_eq!(spec.location(), &DatasetLocation::Convention);
        assert_eq!(spec.assertion_mode(), AssertionMode::Default);
        assert!(spec.overrides());
        assert!(spec.table().is_none());
        assert!(spec.query().is_none());
        assert!(spec.modifiers().is_empty());
    }

    #[test]
    fn blank_location_and_table_mean_unset() {
        assert_eq!(DatasetLocation::parse("  "), DatasetLocation::Convention);

        let spec = ExpectationSpec::default().with_table("").with_query(" ");
        assert!(spec.table().is_none());
        assert!(spec.query().is_none());
    }
}
