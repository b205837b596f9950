use crate::{ConfigError, ExpectationSpec, ModifierRegistry};

/// Expectations declared at one configuration level (a class, a method, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationScope {
    label: String,
    specs: Vec<ExpectationSpec>,
}

impl ExpectationScope {
    pub fn new(label: impl Into<String>, specs: Vec<ExpectationSpec>) -> Self {
        Self {
            label: label.into(),
            specs,
        }
    }

    pub fn single(label: impl Into<String>, spec: ExpectationSpec) -> Self {
        Self::new(label, vec![spec])
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn specs(&self) -> &[ExpectationSpec] {
        &self.specs
    }
}

/// A resolved check together with the scope that declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveCheck {
    scope: String,
    spec: ExpectationSpec,
}

impl EffectiveCheck {
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    #[must_use]
    pub fn spec(&self) -> &ExpectationSpec {
        &self.spec
    }
}

/// Folds scopes, outermost first, into the checks one test must run.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpectationResolver<'a> {
    registry: Option<&'a ModifierRegistry>,
}

impl<'a> ExpectationResolver<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self { registry: None }
    }

    /// Also rejects modifier ids the registry cannot resolve.
    #[must_use]
    pub const fn with_registry(registry: &'a ModifierRegistry) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    pub fn resolve(&self, scopes: &[ExpectationScope]) -> Result<Vec<EffectiveCheck>, ConfigError> {
        for scope in scopes {
            for spec in scope.specs() {
                self.validate(scope.label(), spec)?;
            }
        }

        let checks = scopes.iter().fold(Vec::new(), |outer, scope| {
            let mut retained: Vec<EffectiveCheck> = outer
                .into_iter()
                .filter(|check| !is_overridden(check, scope.specs()))
                .collect();
            retained.extend(scope.specs().iter().map(|spec| EffectiveCheck {
                scope: scope.label().to_string(),
                spec: spec.clone(),
            }));
            retained
        });

        for check in &checks {
            tracing::debug!(
                scope = check.scope(),
                location = %check.spec().location(),
                table = check.spec().table().unwrap_or("*"),
                mode = %check.spec().assertion_mode(),
                "resolved expectation"
            );
        }

        Ok(checks)
    }

    fn validate(&self, scope: &str, spec: &ExpectationSpec) -> Result<(), ConfigError> {
        if let Some(query) = spec.query()
            && spec.table().is_none()
        {
            return Err(ConfigError::QueryWithoutTable {
                scope: scope.to_string(),
                query: query.to_string(),
            });
        }

        if let Some(registry) = self.registry
            && let Some(unknown) = spec.modifiers().iter().find(|id| !registry.contains(id))
        {
            return Err(ConfigError::UnknownModifier {
                scope: scope.to_string(),
                modifier: unknown.to_string(),
            });
        }

        Ok(())
    }
}

fn is_overridden(outer: &EffectiveCheck, inner: &[ExpectationSpec]) -> bool {
    inner
        .iter()
        .filter(|spec| spec.overrides())
        .any(|spec| match spec.table() {
            None => true,
            Some(table) => outer.spec().targets_table(table),
        })
}
