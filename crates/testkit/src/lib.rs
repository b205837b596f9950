mod loader;
mod runner;
mod scope_config;
mod yaml_dataset;

pub use loader::{DatasetLoader, LoaderConfig, TestContext, YamlFileLoader};
pub use runner::{CheckReport, CheckResult, ExpectationRunner, run_expectations};
pub use scope_config::{
    ExpectationConfig, ScopeConfig, load_scopes_from_path, load_scopes_from_str,
};
pub use yaml_dataset::{load_dataset_from_str, load_dataset_with_policy, load_document_from_str};
