use dbexpect_core::{
    BoxError, DatasetComparator, DatasetLocation, EffectiveCheck, Result, TabularDataset,
};
use dbexpect_testkit::{DatasetLoader, TestContext, load_dataset_from_str};

/// Comparator that records what it was handed and fails on demand.
#[derive(Debug, Default)]
pub struct RecordingComparator {
    pub calls: Vec<RecordedCall>,
    pub fail_tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub scope: String,
    pub table: Option<String>,
    pub query: Option<String>,
    pub expected_tables: Vec<String>,
    pub expected: TabularDataset,
}

impl DatasetComparator for RecordingComparator {
    fn compare(
        &mut self,
        check: &EffectiveCheck,
        expected: &TabularDataset,
    ) -> std::result::Result<(), BoxError> {
        let table = check.spec().table().map(str::to_string);
        self.calls.push(RecordedCall {
            scope: check.scope().to_string(),
            table: table.clone(),
            query: check.spec().query().map(str::to_string),
            expected_tables: expected
                .table_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            expected: expected.clone(),
        });

        match table {
            Some(table) if self.fail_tables.contains(&table) => {
                Err(format!("row count mismatch in {table}").into())
            }
            _ => Ok(()),
        }
    }
}

/// Loader that serves YAML fixtures from memory, keyed by location.
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    pub convention: Option<String>,
    pub fixtures: Vec<(String, String)>,
}

impl InMemoryLoader {
    pub fn with_fixture(mut self, location: &str, yaml: &str) -> Self {
        self.fixtures.push((location.to_string(), yaml.to_string()));
        self
    }

    pub fn with_convention(mut self, yaml: &str) -> Self {
        self.convention = Some(yaml.to_string());
        self
    }
}

impl DatasetLoader for InMemoryLoader {
    fn load(&self, context: &TestContext, location: &DatasetLocation) -> Result<TabularDataset> {
        let yaml = match location {
            DatasetLocation::Convention => self.convention.as_deref(),
            DatasetLocation::Path(path) => self
                .fixtures
                .iter()
                .find(|(candidate, _)| candidate == path)
                .map(|(_, yaml)| yaml.as_str()),
        };

        match yaml {
            Some(yaml) => load_dataset_from_str(yaml),
            None => Err(dbexpect_core::LookupError::FixtureNotFound {
                location: format!("{}:{location}", context.class_name()),
            }
            .into()),
        }
    }
}
