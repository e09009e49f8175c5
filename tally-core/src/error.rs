//! Error taxonomy for statement normalization and reporting.
//!
//! Every variant is fatal to the statement (or merge) that raised it.
//! There is no per-row recovery: a malformed statement aborts the run
//! instead of silently dropping rows, because silent row loss would
//! corrupt financial totals.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A `<account>_map` configuration section was not found.
    #[error("configuration section `{section}` is missing")]
    ConfigurationMissing { section: String },

    /// Two canonical columns map to the same source column, so the
    /// inverted mapping would silently drop one of them. The field is not
    /// named `source` because thiserror reserves that name for error
    /// chaining.
    #[error("ambiguous column mapping: source column `{column}` is mapped more than once")]
    AmbiguousMapping { column: String },

    /// A column the mapping targets does not exist in the raw statement.
    #[error("mapped column `{column}` not found in statement")]
    UnmappedColumn { column: String },

    /// A required canonical column is absent after renaming.
    #[error("required column `{column}` missing from normalized statement")]
    MissingRequiredColumn { column: String },

    /// A `transaction_date` value could not be parsed as a calendar date.
    #[error("cannot parse `{value}` in column `{column}` as a date")]
    DateParse { column: String, value: String },

    /// An `amount` value could not be interpreted as a number.
    #[error("cannot parse `{value}` in column `{column}` as an amount")]
    AmountParse { column: String, value: String },

    /// Row-wise concatenation of tables whose column sets disagree.
    #[error("schema mismatch: columns missing in left table: {missing_left:?}, missing in right table: {missing_right:?}")]
    SchemaMismatch {
        missing_left: Vec<String>,
        missing_right: Vec<String>,
    },

    /// A statement file path does not exist.
    #[error("statement file not found: {path}")]
    FileNotFound { path: String },

    #[error("failed to read statement csv")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
