//! Plain-text and JSON rendering of report tables.

use serde_json::{Map, Value, json};

use tally_core::{Cell, Table};

/// How report tables are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Text,
    Json,
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(value) => format!("{value:.2}"),
        other => other.render(),
    }
}

/// Fixed-width text table: headers, a rule, then one line per row.
/// Numbers are right-aligned with two decimals.
pub fn render_table(table: &Table) -> String {
    let mut widths: Vec<usize> = table.columns().iter().map(String::len).collect();
    let rendered: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(format_cell).collect())
        .collect();
    for row in &rendered {
        for (index, text) in row.iter().enumerate() {
            widths[index] = widths[index].max(text.len());
        }
    }

    let mut lines = Vec::with_capacity(table.len() + 2);
    lines.push(
        table
            .columns()
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column:<width$}", width = widths[index]))
            .collect::<Vec<String>>()
            .join("  "),
    );
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<String>>()
            .join("  "),
    );
    for (row, texts) in table.rows().iter().zip(&rendered) {
        let line = texts
            .iter()
            .enumerate()
            .map(|(index, text)| {
                if matches!(row[index], Cell::Number(_)) {
                    format!("{text:>width$}", width = widths[index])
                } else {
                    format!("{text:<width$}", width = widths[index])
                }
            })
            .collect::<Vec<String>>()
            .join("  ");
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}

/// JSON rendering: an array of column-keyed objects.
pub fn table_to_json(table: &Table) -> Value {
    let rows: Vec<Value> = table
        .rows()
        .iter()
        .map(|row| {
            let mut object = Map::new();
            for (column, cell) in table.columns().iter().zip(row) {
                let value = match cell {
                    Cell::Null => Value::Null,
                    Cell::Number(value) => json!(value),
                    Cell::Text(text) => json!(text),
                    Cell::Date(date) => json!(date.format("%Y-%m-%d").to_string()),
                };
                object.insert(column.clone(), value);
            }
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}
