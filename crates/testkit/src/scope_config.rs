use std::{fs, path::Path};

use dbexpect_core::{
    AssertionMode, ConfigError, DatasetLocation, ExpectationScope, ExpectationSpec, LookupError,
    Result,
};
use serde::Deserialize;

use crate::yaml_dataset::parse_yaml_error;

/// The raw expectation fields one scope declares.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpectationConfig {
    #[serde(alias = "location")]
    pub value: String,
    pub assertion_mode: Option<String>,
    pub table: String,
    pub query: String,
    /// `None` resolves to `true`.
    #[serde(rename = "override")]
    pub overrides: Option<bool>,
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeConfig {
    pub scope: String,
    #[serde(default)]
    pub expectations: Vec<ExpectationConfig>,
}

impl ExpectationConfig {
    pub fn to_spec(&self, scope: &str) -> std::result::Result<ExpectationSpec, ConfigError> {
        let assertion_mode = match self.assertion_mode.as_deref().map(str::trim) {
            None | Some("") => AssertionMode::Default,
            Some(raw) => raw
                .parse::<AssertionMode>()
                .map_err(|_| ConfigError::UnknownAssertionMode {
                    scope: scope.to_string(),
                    value: raw.to_string(),
                })?,
        };

        Ok(ExpectationSpec::new(DatasetLocation::parse(&self.value))
            .with_assertion_mode(assertion_mode)
            .with_table(self.table.clone())
            .with_query(self.query.clone())
            .with_override(self.overrides.unwrap_or(true))
            .with_modifiers(self.modifiers.iter().map(String::as_str)))
    }
}

impl ScopeConfig {
    pub fn to_scope(&self) -> std::result::Result<ExpectationScope, ConfigError> {
        let specs = self
            .expectations
            .iter()
            .map(|expectation| expectation.to_spec(&self.scope))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ExpectationScope::new(self.scope.clone(), specs))
    }
}

/// Parses scopes listed outermost first.
pub fn load_scopes_from_str(yaml: &str) -> Result<Vec<ExpectationScope>> {
    let configs: Vec<ScopeConfig> =
        serde_yaml::from_str(yaml).map_err(|source| parse_yaml_error(yaml, source))?;

    let scopes = configs
        .iter()
        .map(ScopeConfig::to_scope)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(scopes)
}

pub fn load_scopes_from_path(path: &Path) -> Result<Vec<ExpectationScope>> {
    let yaml = fs::read_to_string(path).map_err(|source| read_error(path, source))?;
    load_scopes_from_str(&yaml)
}

pub(crate) fn read_error(path: &Path, source: std::io::Error) -> dbexpect_core::Error {
    if source.kind() == std::io::ErrorKind::NotFound {
        return LookupError::FixtureNotFound {
            location: path.display().to_string(),
        }
        .into();
    }

    ConfigError::MalformedDocument {
        message: format!("failed to read `{}`", path.display()),
        source_location: None,
        source: Some(source.into()),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::ExpectationConfig;
    use dbexpect_core::{AssertionMode, ConfigError, DatasetLocation};

    #[test]
    fn omitted_fields_take_declaration_defaults() {
        let spec = ExpectationConfig::default().to_spec("class").unwrap();

        assert_eq!(spec.location(), &DatasetLocation::Convention);
        assert_eq!(spec.assertion_mode(), AssertionMode::Default);
        assert!(spec.overrides());
    }

    #[test]
    fn unknown_assertion_mode_names_scope_and_value() {
        let config = ExpectationConfig {
            assertion_mode: Some("LENIENT".to_string()),
            ..ExpectationConfig::default()
        };

        match config.to_spec("method saves_user").unwrap_err() {
            ConfigError::UnknownAssertionMode { scope, value } => {
                assert_eq!(scope, "method saves_user");
                assert_eq!(value, "LENIENT");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
