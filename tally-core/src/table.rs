//! A small owned table value: ordered columns plus rows of typed cells.
//!
//! Raw statements arrive with source-specific column sets, so the pipeline
//! cannot use a fixed struct until normalization is done. Every operation
//! here consumes the table and returns a new one; pipeline stages never
//! mutate across stage boundaries.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// One table cell. CSV ingestion infers `Number` for numeric fields and
/// `Null` for empty ones; `Date` only appears after date parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    /// Infer a cell from a raw CSV field.
    pub fn from_field(field: &str) -> Cell {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Null;
        }
        if let Ok(value) = trimmed.parse::<f64>()
            && value.is_finite()
        {
            return Cell::Number(value);
        }
        Cell::Text(trimmed.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Plain-text rendering used in error messages and log output.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => value.to_string(),
            Cell::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Date(_) => 0,
            Cell::Number(_) => 1,
            Cell::Text(_) => 2,
            Cell::Null => 3,
        }
    }

    /// Total ordering for sorting: dates, then numbers, then text,
    /// with nulls last.
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Date(a), Cell::Date(b)) => a.cmp(b),
            (Cell::Number(a), Cell::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn dedup_key(&self) -> String {
        match self {
            Cell::Null => "n:".to_string(),
            Cell::Text(text) => format!("t:{text}"),
            Cell::Number(value) => format!("f:{value}"),
            Cell::Date(date) => format!("d:{date}"),
        }
    }
}

/// Ordered columns plus rows of cells. Invariant: every row has exactly
/// one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Table {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row width must match column count"
        );
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Case-insensitive lookup, used when probing raw statement headers.
    pub fn column_index_ci(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| Error::MissingRequiredColumn {
                column: name.to_string(),
            })
    }

    /// Rename columns from source names to canonical names. Every source
    /// name in the mapping must exist in the table.
    pub fn rename_columns(self, mapping: &BTreeMap<String, String>) -> Result<Table> {
        for source in mapping.keys() {
            if self.column_index(source).is_none() {
                return Err(Error::UnmappedColumn {
                    column: source.clone(),
                });
            }
        }
        let columns = self
            .columns
            .into_iter()
            .map(|column| mapping.get(&column).cloned().unwrap_or(column))
            .collect();
        Ok(Table {
            columns,
            rows: self.rows,
        })
    }

    /// Projection: keep exactly the named columns, in the given order.
    pub fn select_columns(self, names: &[&str]) -> Result<Table> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            indices.push(self.require_column(name)?);
        }
        let rows = self
            .rows
            .into_iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table {
            columns: names.iter().map(|name| name.to_string()).collect(),
            rows,
        })
    }

    /// Set a column to the same cell in every row, overwriting the
    /// existing column of that name if there is one. Overwrite semantics
    /// keep provenance tagging correct on already-tagged input.
    pub fn with_column(mut self, name: &str, cell: Cell) -> Table {
        if let Some(index) = self.column_index(name) {
            for row in &mut self.rows {
                row[index] = cell.clone();
            }
            return self;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(cell.clone());
        }
        self
    }

    /// Synthesize a new column from two existing ones with
    /// first-non-null-wins semantics (`col_a` preferred).
    /// Column lookup is case-insensitive.
    pub fn combine_first(mut self, col_a: &str, col_b: &str, new_name: &str) -> Result<Table> {
        let index_a = self
            .column_index_ci(col_a)
            .ok_or_else(|| Error::UnmappedColumn {
                column: col_a.to_string(),
            })?;
        let index_b = self
            .column_index_ci(col_b)
            .ok_or_else(|| Error::UnmappedColumn {
                column: col_b.to_string(),
            })?;
        self.columns.push(new_name.to_string());
        for row in &mut self.rows {
            let combined = if row[index_a].is_null() {
                row[index_b].clone()
            } else {
                row[index_a].clone()
            };
            row.push(combined);
        }
        Ok(self)
    }

    /// Apply a fallible transform to every cell of one column.
    pub fn map_column<F>(mut self, name: &str, transform: F) -> Result<Table>
    where
        F: Fn(&Cell) -> Result<Cell>,
    {
        let index = self.require_column(name)?;
        for row in &mut self.rows {
            row[index] = transform(&row[index])?;
        }
        Ok(self)
    }

    /// Keep rows whose cell in `name` satisfies the predicate.
    pub fn filter_rows<F>(&self, name: &str, predicate: F) -> Result<Table>
    where
        F: Fn(&Cell) -> bool,
    {
        let index = self.require_column(name)?;
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(&row[index]))
            .cloned()
            .collect();
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Row-wise concatenation. Column SETS must match exactly; the right
    /// table's rows are reordered into the left table's column order.
    pub fn concat(mut self, other: Table) -> Result<Table> {
        let left: BTreeSet<&String> = self.columns.iter().collect();
        let right: BTreeSet<&String> = other.columns.iter().collect();
        if left != right {
            return Err(Error::SchemaMismatch {
                missing_left: right
                    .difference(&left)
                    .map(|column| column.to_string())
                    .collect(),
                missing_right: left
                    .difference(&right)
                    .map(|column| column.to_string())
                    .collect(),
            });
        }

        let reorder: Vec<usize> = self
            .columns
            .iter()
            .map(|column| {
                other
                    .columns
                    .iter()
                    .position(|candidate| candidate == column)
                    .expect("column sets verified equal")
            })
            .collect();
        for row in other.rows {
            self.rows
                .push(reorder.iter().map(|&i| row[i].clone()).collect());
        }
        Ok(self)
    }

    /// Stable sort by one column, using [`Cell::compare`].
    pub fn sort_by_column(mut self, name: &str) -> Result<Table> {
        let index = self.require_column(name)?;
        self.rows.sort_by(|a, b| a[index].compare(&b[index]));
        Ok(self)
    }

    /// Drop exact duplicate rows, keeping the first occurrence.
    pub fn dedup_rows(mut self) -> Table {
        let mut seen = HashSet::new();
        self.rows.retain(|row| {
            let key = row
                .iter()
                .map(Cell::dedup_key)
                .collect::<Vec<String>>()
                .join("\u{1f}");
            seen.insert(key)
        });
        self
    }
}
