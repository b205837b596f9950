use dbexpect_core::{
    ConfigError, DatasetBuilder, Document, DuplicatePolicy, Result, RowRecord, SourceLocation,
    TabularDataset, Value,
};
use serde_yaml::{Mapping, Value as YamlValue};

const FIXTURE_SOURCE_LABEL: &str = "yaml fixture";

pub fn load_dataset_from_str(yaml: &str) -> Result<TabularDataset> {
    load_dataset_with_policy(yaml, DuplicatePolicy::Reject)
}

pub fn load_dataset_with_policy(yaml: &str, policy: DuplicatePolicy) -> Result<TabularDataset> {
    let document = load_document_from_str(yaml)?;
    DatasetBuilder::new().duplicate_policy(policy).build(document)
}

/// Parses a fixture into a [`Document`] without folding any names.
pub fn load_document_from_str(yaml: &str) -> Result<Document> {
    let root: YamlValue =
        serde_yaml::from_str(yaml).map_err(|source| parse_yaml_error(yaml, source))?;
    Ok(document_from_yaml(root)?)
}

fn document_from_yaml(root: YamlValue) -> std::result::Result<Document, ConfigError> {
    let tables = match untag(root) {
        YamlValue::Null => return Ok(Document::new()),
        YamlValue::Mapping(tables) => tables,
        other => {
            return Err(ConfigError::malformed(format!(
                "fixture root must be a mapping of table names to rows, found {}",
                kind(&other)
            )));
        }
    };

    let mut document = Document::new();
    for (key, body) in tables {
        let name = key_to_string(key).map_err(|found| {
            ConfigError::malformed(format!("table names must be scalars, found {found}"))
        })?;
        let rows = rows_from_yaml(&name, body)?;
        document.push_table(name, rows);
    }

    Ok(document)
}

fn rows_from_yaml(table: &str, body: YamlValue) -> std::result::Result<Vec<RowRecord>, ConfigError> {
    let items = match untag(body) {
        YamlValue::Null => return Ok(Vec::new()),
        YamlValue::Sequence(items) => items,
        other => {
            return Err(ConfigError::malformed(format!(
                "table `{table}` must be a sequence of rows, found {}",
                kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match untag(item) {
            YamlValue::Mapping(entries) => record_from_mapping(table, index, entries),
            other => Err(ConfigError::malformed(format!(
                "table `{table}` row[{index}] must be a mapping of columns to values, found {}",
                kind(&other)
            ))),
        })
        .collect()
}

fn record_from_mapping(
    table: &str,
    index: usize,
    entries: Mapping,
) -> std::result::Result<RowRecord, ConfigError> {
    entries
        .into_iter()
        .map(|(key, value)| {
            let column = key_to_string(key).map_err(|found| {
                ConfigError::malformed(format!(
                    "table `{table}` row[{index}]: column names must be scalars, found {found}"
                ))
            })?;
            let value = value_from_yaml(value).map_err(|found| {
                ConfigError::malformed(format!(
                    "table `{table}` row[{index}] column `{column}`: nested mapping keys must be scalars, found {found}"
                ))
            })?;
            Ok::<_, ConfigError>((column, value))
        })
        .collect()
}

/// Fails with the kind of the first non-scalar mapping key found at any depth.
fn value_from_yaml(value: YamlValue) -> std::result::Result<Value, &'static str> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(value) => Value::Bool(value),
        YamlValue::Number(number) => number_from_yaml(&number),
        YamlValue::String(text) => Value::String(text),
        YamlValue::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(value_from_yaml)
                .collect::<std::result::Result<_, _>>()?,
        ),
        YamlValue::Mapping(entries) => Value::Mapping(
            entries
                .into_iter()
                .map(|(key, value)| Ok((key_to_string(key)?, value_from_yaml(value)?)))
                .collect::<std::result::Result<_, _>>()?,
        ),
        YamlValue::Tagged(tagged) => value_from_yaml(tagged.value)?,
    })
}

fn number_from_yaml(number: &serde_yaml::Number) -> Value {
    if let Some(integer) = number.as_i64() {
        Value::Integer(integer)
    } else if let Some(unsigned) = number.as_u64() {
        Value::Unsigned(unsigned)
    } else {
        Value::Float(number.as_f64().unwrap_or(f64::NAN))
    }
}

fn untag(value: YamlValue) -> YamlValue {
    let mut value = value;
    while let YamlValue::Tagged(tagged) = value {
        value = tagged.value;
    }
    value
}

fn key_to_string(key: YamlValue) -> std::result::Result<String, &'static str> {
    match untag(key) {
        YamlValue::String(text) => Ok(text),
        YamlValue::Number(number) => Ok(number.to_string()),
        YamlValue::Bool(value) => Ok(value.to_string()),
        other => Err(kind(&other)),
    }
}

fn kind(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

pub(crate) fn parse_yaml_error(yaml: &str, source: serde_yaml::Error) -> dbexpect_core::Error {
    let source_location = source.location().map(|location| SourceLocation {
        line: location.line(),
        column: Some(location.column()),
    });

    ConfigError::MalformedDocument {
        message: format!("invalid YAML in {}", source_excerpt(yaml)),
        source_location,
        source: Some(source.into()),
    }
    .into()
}

fn source_excerpt(yaml: &str) -> String {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return FIXTURE_SOURCE_LABEL.to_string();
    }

    const MAX_CHARS: usize = 64;
    let first_line = trimmed.lines().next().unwrap_or_default();
    let mut excerpt: String = first_line.chars().take(MAX_CHARS).collect();
    if excerpt.len() < trimmed.len() {
        excerpt.push_str("...");
    }
    format!("`{excerpt}`")
}
