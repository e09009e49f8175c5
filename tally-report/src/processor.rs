//! Transaction processor: turn per-account normalized tables into one
//! unified, deduplicated, date-sorted transaction set, then partition it
//! by calendar month.

use std::collections::BTreeMap;

use chrono::Datelike;

use tally_core::{Cell, Error, Result, Table, YEAR_MONTH};

/// Concatenate per-account tables, drop exact duplicate rows, and sort by
/// transaction date. Concatenation fails with `SchemaMismatch` when any
/// two tables disagree on their column set; that is a mapping
/// configuration problem and is never auto-reconciled.
pub fn merge(tables: Vec<Table>) -> Result<Table> {
    let mut iter = tables.into_iter();
    let Some(first) = iter.next() else {
        return Ok(Table::new(
            tally_core::REQUIRED_COLUMNS
                .iter()
                .map(|column| column.to_string())
                .collect(),
        ));
    };

    let mut unified = first;
    for table in iter {
        unified = unified.concat(table)?;
    }

    let before = unified.len();
    let unified = unified.dedup_rows().sort_by_column("transaction_date")?;
    tracing::debug!(
        rows = unified.len(),
        deduped = before - unified.len(),
        "merged transaction set"
    );
    Ok(unified)
}

/// Append the `year_month` grouping column, derived from
/// `transaction_date` truncated to `YYYY-MM`.
pub fn with_year_month(table: Table) -> Result<Table> {
    let index = table
        .column_index("transaction_date")
        .ok_or_else(|| Error::MissingRequiredColumn {
            column: "transaction_date".to_string(),
        })?;

    let mut grouped = Table::new(
        table
            .columns()
            .iter()
            .cloned()
            .chain(std::iter::once(YEAR_MONTH.to_string()))
            .collect(),
    );
    for row in table.rows() {
        let date = row[index].as_date().ok_or_else(|| Error::DateParse {
            column: "transaction_date".to_string(),
            value: row[index].render(),
        })?;
        let mut row = row.clone();
        row.push(Cell::Text(format!("{:04}-{:02}", date.year(), date.month())));
        grouped.push_row(row);
    }
    Ok(grouped)
}

/// Partition the unified set into per-month slices, in ascending
/// year-month order.
pub fn group_by_month(table: Table) -> Result<BTreeMap<String, Table>> {
    let index = table
        .column_index(YEAR_MONTH)
        .ok_or_else(|| Error::MissingRequiredColumn {
            column: YEAR_MONTH.to_string(),
        })?;

    let mut groups: BTreeMap<String, Table> = BTreeMap::new();
    for row in table.rows() {
        let month = row[index].render();
        groups
            .entry(month)
            .or_insert_with(|| Table::new(table.columns().to_vec()))
            .push_row(row.clone());
    }
    Ok(groups)
}
