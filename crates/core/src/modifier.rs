use std::collections::BTreeMap;

use crate::{
    BoxError, ConfigError, DatasetBuilder, FoldedName, ModifierError, ModifierId, TabularDataset,
    Value,
};

/// A named transformation applied to the expected dataset before comparison.
pub trait DatasetModifier: Send + Sync {
    fn modify(&self, dataset: TabularDataset) -> Result<TabularDataset, BoxError>;
}

impl<F> DatasetModifier for F
where
    F: Fn(TabularDataset) -> Result<TabularDataset, BoxError> + Send + Sync,
{
    fn modify(&self, dataset: TabularDataset) -> Result<TabularDataset, BoxError> {
        self(dataset)
    }
}

/// Host-supplied lookup from modifier id to implementation.
#[derive(Default)]
pub struct ModifierRegistry {
    modifiers: BTreeMap<ModifierId, Box<dyn DatasetModifier>>,
}

impl ModifierRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: impl Into<ModifierId>,
        modifier: impl DatasetModifier + 'static,
    ) -> Result<(), ConfigError> {
        let id = id.into();
        if self.modifiers.contains_key(&id) {
            return Err(ConfigError::DuplicateModifier {
                modifier: id.to_string(),
            });
        }
        self.modifiers.insert(id, Box::new(modifier));
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, id: &ModifierId) -> bool {
        self.modifiers.contains_key(id)
    }

    /// Resolves `ids` in order; `scope` labels the error when one is unknown.
    pub fn chain(&self, scope: &str, ids: &[ModifierId]) -> Result<ModifierChain<'_>, ConfigError> {
        let steps = ids
            .iter()
            .map(|id| {
                self.modifiers
                    .get(id)
                    .map(|modifier| (id.clone(), modifier.as_ref()))
                    .ok_or_else(|| ConfigError::UnknownModifier {
                        scope: scope.to_string(),
                        modifier: id.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ModifierChain { steps })
    }
}

impl std::fmt::Debug for ModifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModifierRegistry")
            .field("modifiers", &self.modifiers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Modifiers resolved for one check, applied left to right.
pub struct ModifierChain<'a> {
    steps: Vec<(ModifierId, &'a dyn DatasetModifier)>,
}

impl ModifierChain<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn apply(&self, dataset: TabularDataset) -> Result<TabularDataset, ModifierError> {
        let mut current = dataset;

        for (step, (id, modifier)) in self.steps.iter().enumerate() {
            tracing::debug!(modifier = %id, step, tables = current.len(), "applying modifier");
            current = modifier
                .modify(current)
                .map_err(|source| ModifierError::Failed {
                    modifier: id.to_string(),
                    step,
                    source,
                })?;
        }

        Ok(current)
    }
}

/// Replaces string cells equal to a token (e.g. `[null]`) in every table.
#[derive(Debug, Clone)]
pub struct ReplaceValues {
    replacements: Vec<(String, Value)>,
}

impl ReplaceValues {
    pub fn new(token: impl Into<String>, replacement: Value) -> Self {
        Self {
            replacements: vec![(token.into(), replacement)],
        }
    }

    #[must_use]
    pub fn and(mut self, token: impl Into<String>, replacement: Value) -> Self {
        self.replacements.push((token.into(), replacement));
        self
    }

    fn replacement_for(&self, value: &Value) -> Option<&Value> {
        let text = value.as_str()?;
        self.replacements
            .iter()
            .find(|(token, _)| token == text)
            .map(|(_, replacement)| replacement)
    }
}

impl DatasetModifier for ReplaceValues {
    fn modify(&self, dataset: TabularDataset) -> Result<TabularDataset, BoxError> {
        let mut document = dataset.to_document();
        for table in document.tables_mut() {
            for row in &mut table.rows {
                for (_, value) in row.iter_mut() {
                    if let Some(replacement) = self.replacement_for(value) {
                        *value = replacement.clone();
                    }
                }
            }
        }
        Ok(DatasetBuilder::new().build(document)?)
    }
}

/// Drops the named tables, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct ExcludeTables {
    tables: Vec<FoldedName>,
}

impl ExcludeTables {
    pub fn new<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tables: tables
                .into_iter()
                .map(|table| FoldedName::new(table.as_ref()))
                .collect(),
        }
    }
}

impl DatasetModifier for ExcludeTables {
    fn modify(&self, dataset: TabularDataset) -> Result<TabularDataset, BoxError> {
        let mut document = dataset.to_document();
        document
            .tables_mut()
            .retain(|table| !self.tables.iter().any(|name| name.matches(&table.name)));
        Ok(DatasetBuilder::new().build(document)?)
    }
}
