mod comparison;
mod dataset;
mod document;
mod error;
mod expectation;
mod ident;
mod modifier;
mod resolver;
mod table;
mod value;

pub use comparison::{DataSet, DatasetComparator};
pub use dataset::{DatasetBuilder, DuplicatePolicy, TabularDataset, Tables};
pub use document::{Document, DocumentTable, RowRecord, row};
pub use error::{
    BoxError, ConfigError, Error, LookupError, ModifierError, Result, SourceLocation,
};
pub use expectation::{
    AssertionMode, DatasetLocation, ExpectationSpec, ModifierId, UnknownAssertionMode,
};
pub use ident::{FoldedName, fold_name};
pub use modifier::{DatasetModifier, ExcludeTables, ModifierChain, ModifierRegistry, ReplaceValues};
pub use resolver::{EffectiveCheck, ExpectationResolver, ExpectationScope};
pub use table::{Row, Table};
pub use value::Value;
