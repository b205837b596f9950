use std::{collections::BTreeMap, iter::Rev, slice};

use crate::{
    ConfigError, Document, FoldedName, LookupError, Result, Row, RowRecord, Table, Value,
    fold_name,
};

/// How the builder treats two names that fold to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`ConfigError::DuplicateTable`] / [`ConfigError::DuplicateColumn`].
    #[default]
    Reject,
    /// Later declaration wins; the table keeps the position of the first one.
    Overwrite,
}

/// Immutable, case-insensitive set of tables built from a [`Document`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularDataset {
    tables: Vec<Table>,
    index: BTreeMap<String, usize>,
}

impl TabularDataset {
    pub fn from_document(document: Document) -> Result<Self> {
        DatasetBuilder::new().build(document)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.find_table(name).ok_or_else(|| {
            LookupError::TableNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    #[must_use]
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.index
            .get(&fold_name(name))
            .map(|position| &self.tables[*position])
    }

    #[must_use]
    pub fn contains_table(&self, name: &str) -> bool {
        self.index.contains_key(&fold_name(name))
    }

    /// Folded table names, each once, in insertion order.
    #[must_use]
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(Table::folded_name).collect()
    }

    #[must_use]
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn value(&self, table: &str, row: usize, column: &str) -> Result<Option<&Value>> {
        self.table(table)?.value(row, column)
    }

    pub fn iter(&self) -> Tables<'_> {
        Tables {
            inner: self.tables.iter(),
        }
    }

    /// Tables last-to-first, for teardown in reverse dependency order.
    pub fn reverse_iter(&self) -> Rev<Tables<'_>> {
        self.iter().rev()
    }

    /// Rebuilds an editable document. Table columns keep their first-row order
    /// and spelling; extra keys of later rows follow in folded order.
    #[must_use]
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        for table in &self.tables {
            let rows = table
                .rows()
                .iter()
                .map(|row| row_to_record(table.columns(), row))
                .collect();
            document.push_table(table.name(), rows);
        }
        document
    }
}

impl<'a> IntoIterator for &'a TabularDataset {
    type Item = &'a Table;
    type IntoIter = Tables<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct Tables<'a> {
    inner: slice::Iter<'a, Table>,
}

impl<'a> Iterator for Tables<'a> {
    type Item = &'a Table;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Tables<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Tables<'_> {}

#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetBuilder {
    duplicates: DuplicatePolicy,
}

impl DatasetBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            duplicates: DuplicatePolicy::Reject,
        }
    }

    #[must_use]
    pub const fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn build(&self, document: Document) -> Result<TabularDataset> {
        let mut dataset = TabularDataset::default();

        for entry in document.into_tables() {
            let table = self.build_table(FoldedName::new(entry.name), entry.rows)?;
            self.insert_table(&mut dataset, table)?;
        }

        Ok(dataset)
    }

    fn build_table(&self, name: FoldedName, records: Vec<RowRecord>) -> Result<Table> {
        let columns = records
            .first()
            .map(|first| first_row_columns(first))
            .unwrap_or_default();

        let mut rows = Vec::with_capacity(records.len());
        for (row_index, record) in records.into_iter().enumerate() {
            rows.push(self.build_row(&name, row_index, record)?);
        }

        tracing::debug!(
            table = name.original(),
            columns = columns.len(),
            rows = rows.len(),
            "built fixture table"
        );

        Ok(Table::new(name, columns, rows))
    }

    fn build_row(&self, table: &FoldedName, row_index: usize, record: RowRecord) -> Result<Row> {
        let mut row = Row::default();

        for (column, value) in record {
            let Some(first) = row.insert(column.clone(), value) else {
                continue;
            };

            match self.duplicates {
                DuplicatePolicy::Reject => {
                    return Err(ConfigError::DuplicateColumn {
                        table: table.original().to_string(),
                        row: row_index,
                        folded: fold_name(&column),
                        first,
                        second: column,
                    }
                    .into());
                }
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(
                        table = table.original(),
                        row = row_index,
                        first = %first,
                        second = %column,
                        "duplicate column after case folding; keeping the later value"
                    );
                }
            }
        }

        Ok(row)
    }

    fn insert_table(&self, dataset: &mut TabularDataset, table: Table) -> Result<()> {
        let folded = table.folded_name().to_string();

        let Some(&position) = dataset.index.get(&folded) else {
            dataset.index.insert(folded, dataset.tables.len());
            dataset.tables.push(table);
            return Ok(());
        };

        let first = dataset.tables[position].name().to_string();
        match self.duplicates {
            DuplicatePolicy::Reject => Err(ConfigError::DuplicateTable {
                first,
                second: table.name().to_string(),
                folded,
            }
            .into()),
            DuplicatePolicy::Overwrite => {
                tracing::warn!(
                    first = %first,
                    second = table.name(),
                    "duplicate table after case folding; keeping the later declaration"
                );
                dataset.tables[position] = table;
                Ok(())
            }
        }
    }
}

fn first_row_columns(first: &RowRecord) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(first.len());
    for (column, _) in first {
        let folded = fold_name(column);
        if !columns.iter().any(|seen| fold_name(seen) == folded) {
            columns.push(column.clone());
        }
    }
    columns
}

fn row_to_record(columns: &[String], row: &Row) -> RowRecord {
    let mut record = RowRecord::with_capacity(row.len());
    let mut emitted = Vec::with_capacity(row.len());

    for column in columns {
        let folded = fold_name(column);
        if let Some(value) = row.get(&folded) {
            record.push((column.clone(), value.clone()));
            emitted.push(folded);
        }
    }

    for (folded, value) in row.iter() {
        if emitted.iter().any(|seen| seen == folded) {
            continue;
        }
        let declared = row.declared_name(folded).unwrap_or(folded);
        record.push((declared.to_string(), value.clone()));
    }

    record
}
