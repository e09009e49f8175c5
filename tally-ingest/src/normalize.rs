//! Normalize one account's raw statement into the canonical schema.
//!
//! Normalization is a stateless pipeline of five fixed stages, run in
//! this exact order (later stages assume earlier stages' output shape):
//!
//! 1. amount unification (synthesize `amount` from debit/credit)
//! 2. column renaming (source → canonical, per account mapping)
//! 3. provenance tagging (`from_account`)
//! 4. projection onto [`REQUIRED_COLUMNS`]
//! 5. bank-specific sign adjustment
//!
//! followed by `transaction_date` parsing. The sign adjustment is the
//! only stage that varies by bank.

use chrono::NaiveDate;

use tally_core::{Cell, Error, REQUIRED_COLUMNS, Result, Table};

use crate::mapping::ColumnMapping;

/// Date layouts the supported bank exports actually use. Two-digit years
/// are deliberately unsupported: `%Y` already consumes them ambiguously.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Known bank variants. Each carries its own amount adjustment; account
/// names that match no known bank deliberately fall back to `Default`
/// (identity), never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    Citi,
    Discover,
    Default,
}

impl Bank {
    /// Select the variant for an account by exact name match.
    pub fn for_account(account_id: &str) -> Bank {
        match account_id {
            "citi" => Bank::Citi,
            "discover" => Bank::Discover,
            _ => Bank::Default,
        }
    }

    /// Sign-convention correction. Citi and Discover statements encode
    /// spend as positive; the canonical schema requires spend negative.
    pub fn adjust_amount(&self, value: f64) -> f64 {
        match self {
            Bank::Citi | Bank::Discover => -value,
            Bank::Default => value,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Bank::Citi => "citi",
            Bank::Discover => "discover",
            Bank::Default => "default",
        }
    }
}

/// Run the full normalization pipeline for one statement.
pub fn normalize(statement: Table, account_id: &str, mapping: &ColumnMapping) -> Result<Table> {
    let bank = Bank::for_account(account_id);
    tracing::debug!(account = account_id, bank = bank.name(), "normalizing statement");

    let table = unify_amount(statement)?;
    let table = table.rename_columns(&mapping.source_to_canonical())?;
    let table = table.with_column("from_account", Cell::Text(account_id.to_string()));
    let table = table.select_columns(&REQUIRED_COLUMNS)?;
    let table = adjust_amounts(table, bank)?;
    parse_dates(table)
}

/// Stage 1: make sure an `amount` column exists, synthesizing it from
/// debit/credit with first-non-null-wins (debit preferred).
fn unify_amount(table: Table) -> Result<Table> {
    if table.column_index_ci("amount").is_some() {
        tracing::debug!("amount column already present");
        return Ok(table);
    }
    let table = table.combine_first("debit", "credit", "amount")?;
    tracing::debug!("amount column synthesized from debit/credit");
    Ok(table)
}

/// Stage 5: apply the bank's sign adjustment to every amount cell.
fn adjust_amounts(table: Table, bank: Bank) -> Result<Table> {
    table.map_column("amount", |cell| match cell {
        Cell::Number(value) => Ok(Cell::Number(bank.adjust_amount(*value))),
        Cell::Null => Ok(Cell::Null),
        other => Err(Error::AmountParse {
            column: "amount".to_string(),
            value: other.render(),
        }),
    })
}

/// Parse `transaction_date` values into calendar dates. Any unparseable
/// value aborts the statement; rows are never silently dropped.
fn parse_dates(table: Table) -> Result<Table> {
    table.map_column("transaction_date", |cell| match cell {
        Cell::Date(date) => Ok(Cell::Date(*date)),
        Cell::Text(text) => parse_date(text).map(Cell::Date).ok_or_else(|| Error::DateParse {
            column: "transaction_date".to_string(),
            value: text.clone(),
        }),
        other => Err(Error::DateParse {
            column: "transaction_date".to_string(),
            value: other.render(),
        }),
    })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
