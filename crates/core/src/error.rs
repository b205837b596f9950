use std::error::Error as StdError;

use thiserror::Error;

pub type BoxError = Box<dyn StdError + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Modifier(#[from] ModifierError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("table `{name}` not found in dataset")]
    TableNotFound { name: String },
    #[error("row {row} out of bounds for table `{table}` (row_count={row_count})")]
    RowOutOfBounds {
        table: String,
        row: usize,
        row_count: usize,
    },
    #[error("fixture `{location}` not found")]
    FixtureNotFound { location: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{scope}: `query` is set ({query}) but `table` is empty")]
    QueryWithoutTable { scope: String, query: String },
    #[error("duplicate table `{second}` folds to `{folded}` already used by `{first}`")]
    DuplicateTable {
        first: String,
        second: String,
        folded: String,
    },
    #[error(
        "table `{table}` row[{row}]: duplicate column `{second}` folds to `{folded}` already used by `{first}`"
    )]
    DuplicateColumn {
        table: String,
        row: usize,
        first: String,
        second: String,
        folded: String,
    },
    #[error("malformed fixture document{}: {message}", format_location(.source_location.as_ref()))]
    MalformedDocument {
        message: String,
        source_location: Option<SourceLocation>,
        #[source]
        source: Option<BoxError>,
    },
    #[error("{scope}: unknown assertion_mode `{value}`")]
    UnknownAssertionMode { scope: String, value: String },
    #[error("{scope}: unknown modifier `{modifier}` in `modifiers`")]
    UnknownModifier { scope: String, modifier: String },
    #[error("modifier `{modifier}` is already registered")]
    DuplicateModifier { modifier: String },
}

impl ConfigError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
            source_location: None,
            source: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ModifierError {
    #[error("modifier `{modifier}` (step {step}) failed: {source}")]
    Failed {
        modifier: String,
        step: usize,
        #[source]
        source: BoxError,
    },
}

fn format_location(location: Option<&SourceLocation>) -> String {
    match location {
        Some(SourceLocation {
            line,
            column: Some(column),
        }) => format!(" at line {line}, column {column}"),
        Some(SourceLocation { line, column: None }) => format!(" at line {line}"),
        None => String::new(),
    }
}
