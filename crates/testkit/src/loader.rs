use std::{
    fs,
    path::{Path, PathBuf},
};

use dbexpect_core::{DatasetLocation, DuplicatePolicy, Result, TabularDataset};

use crate::{scope_config::read_error, yaml_dataset::load_dataset_with_policy};

const DEFAULT_EXPECTED_SUFFIX: &str = "-expected.yml";

/// Identifies the test an expectation belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestContext {
    pub class: String,
    pub method: String,
}

impl TestContext {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Last path segment of `class`, e.g. `UserRepositoryTest` for `repo::UserRepositoryTest`.
    #[must_use]
    pub fn class_name(&self) -> &str {
        self.class.rsplit("::").next().unwrap_or(&self.class)
    }
}

pub trait DatasetLoader {
    fn load(&self, context: &TestContext, location: &DatasetLocation) -> Result<TabularDataset>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub base_dir: PathBuf,
    pub expected_suffix: String,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            expected_suffix: DEFAULT_EXPECTED_SUFFIX.to_string(),
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }
}

impl LoaderConfig {
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }
}

/// Loads YAML fixtures from disk, relative to `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct YamlFileLoader {
    config: LoaderConfig,
}

impl YamlFileLoader {
    #[must_use]
    pub const fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    #[must_use]
    pub fn resolve_path(&self, context: &TestContext, location: &DatasetLocation) -> PathBuf {
        match location {
            DatasetLocation::Convention => self.config.base_dir.join(format!(
                "{}{}",
                context.class_name(),
                self.config.expected_suffix
            )),
            DatasetLocation::Path(path) => {
                let path = Path::new(path);
                if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.config.base_dir.join(path)
                }
            }
        }
    }
}

impl DatasetLoader for YamlFileLoader {
    fn load(&self, context: &TestContext, location: &DatasetLocation) -> Result<TabularDataset> {
        let path = self.resolve_path(context, location);
        tracing::debug!(path = %path.display(), %location, "loading fixture");

        let yaml = fs::read_to_string(&path).map_err(|source| read_error(&path, source))?;
        load_dataset_with_policy(&yaml, self.config.duplicate_policy)
    }
}
