//! Load a statement CSV into a raw [`Table`].
//!
//! Headers are kept exactly as the bank exports them; renaming to the
//! canonical schema happens later in the normalizer. Fields are trimmed
//! and numeric fields become [`Cell::Number`] so debit/credit synthesis
//! and sign adjustment can operate on typed values.

use std::path::Path;

use tally_core::{Cell, Error, Result, Table};

pub fn load_statement(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let columns = reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect::<Vec<String>>();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(Cell::from_field).collect());
    }

    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = ?table.columns(),
        "loaded statement"
    );
    Ok(table)
}
