use dbexpect_core::{
    DatasetComparator, DatasetLocation, EffectiveCheck, ExpectationResolver, ExpectationScope,
    LookupError, ModifierRegistry, Result, TabularDataset,
};

use crate::{DatasetLoader, TestContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Passed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub scope: String,
    pub location: DatasetLocation,
    pub table: Option<String>,
    pub result: CheckResult,
}

impl CheckReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.result == CheckResult::Passed
    }
}

/// Drives load, resolve, modify and compare for one test.
pub struct ExpectationRunner<'a> {
    loader: &'a dyn DatasetLoader,
    registry: &'a ModifierRegistry,
}

impl<'a> ExpectationRunner<'a> {
    #[must_use]
    pub fn new(loader: &'a dyn DatasetLoader, registry: &'a ModifierRegistry) -> Self {
        Self { loader, registry }
    }

    /// Configuration errors abort before the comparator runs; every other
    /// failure is reported on its own check.
    pub fn run(
        &self,
        context: &TestContext,
        scopes: &[ExpectationScope],
        comparator: &mut dyn DatasetComparator,
    ) -> Result<Vec<CheckReport>> {
        let checks = ExpectationResolver::with_registry(self.registry).resolve(scopes)?;

        let reports = checks
            .iter()
            .map(|check| {
                let result = match self.run_check(context, check, comparator) {
                    Ok(()) => CheckResult::Passed,
                    Err(message) => CheckResult::Failed(message),
                };
                log_outcome(context, check, &result);

                CheckReport {
                    scope: check.scope().to_string(),
                    location: check.spec().location().clone(),
                    table: check.spec().table().map(str::to_string),
                    result,
                }
            })
            .collect();

        Ok(reports)
    }

    fn run_check(
        &self,
        context: &TestContext,
        check: &EffectiveCheck,
        comparator: &mut dyn DatasetComparator,
    ) -> std::result::Result<(), String> {
        let expected = self.prepare_expected(context, check)?;

        comparator
            .compare(check, &expected)
            .map_err(|error| format!("comparison failed: {error}"))
    }

    fn prepare_expected(
        &self,
        context: &TestContext,
        check: &EffectiveCheck,
    ) -> std::result::Result<TabularDataset, String> {
        let spec = check.spec();
        let chain = self
            .registry
            .chain(check.scope(), spec.modifiers())
            .map_err(|error| error.to_string())?;

        let loaded = self
            .loader
            .load(context, spec.location())
            .map_err(|error| error.to_string())?;
        let expected = chain.apply(loaded).map_err(|error| error.to_string())?;

        if let Some(table) = spec.table()
            && !expected.contains_table(table)
        {
            return Err(LookupError::TableNotFound {
                name: table.to_string(),
            }
            .to_string());
        }

        Ok(expected)
    }
}

/// Convenience wrapper over [`ExpectationRunner::run`].
pub fn run_expectations(
    loader: &dyn DatasetLoader,
    registry: &ModifierRegistry,
    context: &TestContext,
    scopes: &[ExpectationScope],
    comparator: &mut dyn DatasetComparator,
) -> Result<Vec<CheckReport>> {
    ExpectationRunner::new(loader, registry).run(context, scopes, comparator)
}

fn log_outcome(context: &TestContext, check: &EffectiveCheck, result: &CheckResult) {
    match result {
        CheckResult::Passed => tracing::info!(
            class = %context.class,
            method = %context.method,
            scope = check.scope(),
            table = check.spec().table().unwrap_or("*"),
            "expectation passed"
        ),
        CheckResult::Failed(message) => tracing::info!(
            class = %context.class,
            method = %context.method,
            scope = check.scope(),
            table = check.spec().table().unwrap_or("*"),
            %message,
            "expectation failed"
        ),
    }
}
