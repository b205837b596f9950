use std::iter::Rev;

use crate::{BoxError, EffectiveCheck, Result, TabularDataset, Table, Tables};

/// The view of an expected dataset that comparison engines consume.
pub trait DataSet {
    fn table(&self, name: &str) -> Result<&Table>;
    fn table_names(&self) -> Vec<&str>;
    fn tables(&self) -> &[Table];
    fn iter(&self) -> Tables<'_>;
    fn reverse_iter(&self) -> Rev<Tables<'_>>;

    /// Table names always match case-insensitively.
    fn is_case_sensitive_table_names(&self) -> bool {
        false
    }
}

impl DataSet for TabularDataset {
    fn table(&self, name: &str) -> Result<&Table> {
        TabularDataset::table(self, name)
    }

    fn table_names(&self) -> Vec<&str> {
        TabularDataset::table_names(self)
    }

    fn tables(&self) -> &[Table] {
        TabularDataset::tables(self)
    }

    fn iter(&self) -> Tables<'_> {
        TabularDataset::iter(self)
    }

    fn reverse_iter(&self) -> Rev<Tables<'_>> {
        TabularDataset::reverse_iter(self)
    }
}

/// Compares the expected dataset of one check against live state.
///
/// Table and query scoping are read from `check.spec()`; how rows are
/// matched under each assertion mode is entirely up to the implementation.
pub trait DatasetComparator {
    fn compare(
        &mut self,
        check: &EffectiveCheck,
        expected: &TabularDataset,
    ) -> std::result::Result<(), BoxError>;
}
