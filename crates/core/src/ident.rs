use std::fmt;

/// Folds a table or column name to its lookup key.
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.to_uppercase()
}

/// A name kept in its declared spelling alongside the folded lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedName {
    original: String,
    folded: String,
}

impl FoldedName {
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        let folded = fold_name(&original);
        Self { original, folded }
    }

    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    #[must_use]
    pub fn folded(&self) -> &str {
        &self.folded
    }

    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.folded == fold_name(other)
    }
}

impl fmt::Display for FoldedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
