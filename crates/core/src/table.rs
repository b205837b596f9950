use std::collections::BTreeMap;

use crate::{FoldedName, LookupError, Result, Value, fold_name};

/// A row keyed by folded column name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: BTreeMap<String, Value>,
    // Declared spelling per folded key, used when rebuilding documents.
    declared: BTreeMap<String, String>,
}

impl Row {
    pub(crate) fn insert(&mut self, declared: String, value: Value) -> Option<String> {
        let folded = fold_name(&declared);
        let previous = self.declared.insert(folded.clone(), declared);
        self.values.insert(folded, value);
        previous
    }

    /// Case-insensitive lookup; `None` when the row never declared the column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(&fold_name(column))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries as `(folded column, value)` in folded-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .map(|(column, value)| (column.as_str(), value))
    }

    pub(crate) fn declared_name(&self, folded: &str) -> Option<&str> {
        self.declared.get(folded).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: FoldedName,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub(crate) fn new(name: FoldedName, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name,
            columns,
            rows,
        }
    }

    /// Table name as declared in the fixture.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.original()
    }

    #[must_use]
    pub fn folded_name(&self) -> &str {
        self.name.folded()
    }

    /// Column names taken from the first row, in its declared order and spelling.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        let folded = fold_name(column);
        self.columns.iter().any(|declared| fold_name(declared) == folded)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Result<&Row> {
        self.rows.get(index).ok_or_else(|| {
            LookupError::RowOutOfBounds {
                table: self.name.original().to_string(),
                row: index,
                row_count: self.rows.len(),
            }
            .into()
        })
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Bounds-checks `row` first, then looks the column up case-insensitively.
    pub fn value(&self, row: usize, column: &str) -> Result<Option<&Value>> {
        Ok(self.row(row)?.get(column))
    }
}
