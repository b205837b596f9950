use crate::Value;

/// One row as declared in the fixture, keys in declaration order.
pub type RowRecord = Vec<(String, Value)>;

/// A parsed fixture: table name to ordered rows, tables in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    tables: Vec<DocumentTable>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTable {
    pub name: String,
    pub rows: Vec<RowRecord>,
}

impl Document {
    #[must_use]
    pub const fn new() -> Self {
        Self { tables: Vec::new() }
    }

    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<RowRecord>) -> Self {
        self.push_table(name, rows);
        self
    }

    pub fn push_table(&mut self, name: impl Into<String>, rows: Vec<RowRecord>) {
        self.tables.push(DocumentTable {
            name: name.into(),
            rows,
        });
    }

    #[must_use]
    pub fn tables(&self) -> &[DocumentTable] {
        &self.tables
    }

    pub fn tables_mut(&mut self) -> &mut Vec<DocumentTable> {
        &mut self.tables
    }

    #[must_use]
    pub fn into_tables(self) -> Vec<DocumentTable> {
        self.tables
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Builds a [`RowRecord`] from `(column, value)` pairs.
pub fn row<K, V, I>(entries: I) -> RowRecord
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
