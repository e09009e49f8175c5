//! Monthly report views over one slice of the unified transaction set.
//!
//! Sign convention: `amount > 0` is an earning, `amount < 0` an expense.
//! Zero-amount rows appear in neither view; the partition boundary is
//! strict inequality on both sides.

use std::collections::{BTreeMap, BTreeSet};

use tally_core::{Cell, Error, Result, Table, YEAR_MONTH};

/// Margin label appended to both pivot axes.
const TOTAL: &str = "Total";

/// Read-only report over one month-slice (or any slice) of transactions.
/// Short-lived: one instance per month per reporting pass.
pub struct Report<'a> {
    statement: &'a Table,
}

impl<'a> Report<'a> {
    pub fn new(statement: &'a Table) -> Report<'a> {
        Report { statement }
    }

    /// Rows with a strictly positive amount. Empty table if none.
    pub fn earnings(&self) -> Result<Table> {
        self.statement
            .filter_rows("amount", |cell| cell.as_number().is_some_and(|v| v > 0.0))
    }

    /// Rows with a strictly negative amount. Empty table if none.
    pub fn expenses(&self) -> Result<Table> {
        self.statement
            .filter_rows("amount", |cell| cell.as_number().is_some_and(|v| v < 0.0))
    }

    /// Expense amounts pivoted by category × year-month, with a `Total`
    /// row and column summing the opposite axis.
    pub fn expenses_by_category(&self) -> Result<Table> {
        self.pivot_expenses("category")
    }

    /// Same pivot keyed on sub-category.
    pub fn expenses_by_sub_category(&self) -> Result<Table> {
        self.pivot_expenses("sub_category")
    }

    fn pivot_expenses(&self, index_column: &str) -> Result<Table> {
        let expenses = self.expenses()?;
        let index = expenses
            .column_index(index_column)
            .ok_or_else(|| Error::MissingRequiredColumn {
                column: index_column.to_string(),
            })?;
        let month_index =
            expenses
                .column_index(YEAR_MONTH)
                .ok_or_else(|| Error::MissingRequiredColumn {
                    column: YEAR_MONTH.to_string(),
                })?;
        let amount_index =
            expenses
                .column_index("amount")
                .ok_or_else(|| Error::MissingRequiredColumn {
                    column: "amount".to_string(),
                })?;

        let mut months: BTreeSet<String> = BTreeSet::new();
        let mut sums: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for row in expenses.rows() {
            let group = row[index].render();
            let month = row[month_index].render();
            let amount = row[amount_index].as_number().unwrap_or(0.0);
            *sums.entry(group).or_default().entry(month.clone()).or_insert(0.0) += amount;
            months.insert(month);
        }

        let mut columns = vec![index_column.to_string()];
        columns.extend(months.iter().cloned());
        columns.push(TOTAL.to_string());
        let mut pivot = Table::new(columns);

        let mut column_totals: BTreeMap<String, f64> = BTreeMap::new();
        let mut grand_total = 0.0;
        for (group, month_sums) in &sums {
            let mut row = vec![Cell::Text(group.clone())];
            let mut row_total = 0.0;
            for month in &months {
                // absent combinations are zero, not missing
                let value = month_sums.get(month).copied().unwrap_or(0.0);
                row.push(Cell::Number(value));
                row_total += value;
                *column_totals.entry(month.clone()).or_insert(0.0) += value;
            }
            row.push(Cell::Number(row_total));
            grand_total += row_total;
            pivot.push_row(row);
        }

        let mut total_row = vec![Cell::Text(TOTAL.to_string())];
        for month in &months {
            total_row.push(Cell::Number(
                column_totals.get(month).copied().unwrap_or(0.0),
            ));
        }
        total_row.push(Cell::Number(grand_total));
        pivot.push_row(total_row);

        Ok(pivot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn month_slice(rows: &[(f64, &str, &str, &str)]) -> Table {
        // (amount, category, sub_category, year_month)
        let mut table = Table::new(vec![
            "transaction_date".to_string(),
            "amount".to_string(),
            "category".to_string(),
            "sub_category".to_string(),
            "from_account".to_string(),
            YEAR_MONTH.to_string(),
        ]);
        for (amount, category, sub_category, month) in rows {
            table.push_row(vec![
                Cell::Date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()),
                Cell::Number(*amount),
                Cell::Text(category.to_string()),
                Cell::Text(sub_category.to_string()),
                Cell::Text("citi".to_string()),
                Cell::Text(month.to_string()),
            ]);
        }
        table
    }

    fn number(table: &Table, row: usize, column: &str) -> f64 {
        table.rows()[row][table.column_index(column).unwrap()]
            .as_number()
            .unwrap()
    }

    #[test]
    fn test_earnings_expenses_and_zero_rows_partition() {
        let slice = month_slice(&[
            (-50.0, "Food", "Groceries", "2025-01"),
            (0.0, "Transfer", "Internal", "2025-01"),
            (900.0, "Income", "Salary", "2025-01"),
        ]);
        let report = Report::new(&slice);

        let earnings = report.earnings().unwrap();
        let expenses = report.expenses().unwrap();
        assert_eq!(earnings.len(), 1);
        assert_eq!(expenses.len(), 1);
        assert_eq!(number(&earnings, 0, "amount"), 900.0);
        assert_eq!(number(&expenses, 0, "amount"), -50.0);
        // the zero-amount row is in neither view
        assert_eq!(earnings.len() + expenses.len(), slice.len() - 1);
    }

    #[test]
    fn test_empty_views_are_not_errors() {
        let slice = month_slice(&[(-50.0, "Food", "Groceries", "2025-01")]);
        let report = Report::new(&slice);
        let earnings = report.earnings().unwrap();
        assert!(earnings.is_empty());
        assert_eq!(earnings.columns(), slice.columns());
    }

    #[test]
    fn test_pivot_totals_sum_both_axes() {
        let slice = month_slice(&[
            (-50.0, "Food", "Groceries", "2025-01"),
            (-30.0, "Gas", "Fuel", "2025-01"),
        ]);
        let pivot = Report::new(&slice).expenses_by_category().unwrap();

        assert_eq!(pivot.columns(), ["category", "2025-01", "Total"]);
        assert_eq!(number(&pivot, 0, "2025-01"), -50.0); // Food
        assert_eq!(number(&pivot, 1, "2025-01"), -30.0); // Gas
        assert_eq!(number(&pivot, 0, "Total"), -50.0);
        assert_eq!(number(&pivot, 1, "Total"), -30.0);
        // Total row sums across categories, and its Total cell is the grand total
        let total_row = pivot.len() - 1;
        assert_eq!(pivot.rows()[total_row][0], Cell::Text("Total".to_string()));
        assert_eq!(number(&pivot, total_row, "2025-01"), -80.0);
        assert_eq!(number(&pivot, total_row, "Total"), -80.0);
    }

    #[test]
    fn test_pivot_fills_missing_combinations_with_zero() {
        let slice = month_slice(&[
            (-50.0, "Food", "Groceries", "2025-01"),
            (-30.0, "Gas", "Fuel", "2025-02"),
        ]);
        let pivot = Report::new(&slice).expenses_by_category().unwrap();

        assert_eq!(pivot.columns(), ["category", "2025-01", "2025-02", "Total"]);
        assert_eq!(number(&pivot, 0, "2025-02"), 0.0); // Food has no Feb spend
        assert_eq!(number(&pivot, 1, "2025-01"), 0.0); // Gas has no Jan spend
        assert_eq!(number(&pivot, 0, "Total"), -50.0);
        assert_eq!(number(&pivot, 1, "Total"), -30.0);
    }

    #[test]
    fn test_sub_category_pivot_uses_sub_category_axis() {
        let slice = month_slice(&[
            (-50.0, "Food", "Groceries", "2025-01"),
            (-25.0, "Food", "Dining", "2025-01"),
        ]);
        let pivot = Report::new(&slice).expenses_by_sub_category().unwrap();

        assert_eq!(pivot.columns()[0], "sub_category");
        // BTreeMap ordering: Dining before Groceries
        assert_eq!(pivot.rows()[0][0], Cell::Text("Dining".to_string()));
        assert_eq!(pivot.rows()[1][0], Cell::Text("Groceries".to_string()));
        assert_eq!(number(&pivot, 2, "Total"), -75.0);
    }

    #[test]
    fn test_pivot_with_no_expenses_is_a_zero_total_table() {
        let slice = month_slice(&[(900.0, "Income", "Salary", "2025-01")]);
        let pivot = Report::new(&slice).expenses_by_category().unwrap();

        // No expense rows: no month columns, just the index and the margin,
        // with a single all-zero Total row.
        assert_eq!(pivot.columns(), ["category", "Total"]);
        assert_eq!(pivot.len(), 1);
        assert_eq!(pivot.rows()[0][0], Cell::Text("Total".to_string()));
        assert_eq!(number(&pivot, 0, "Total"), 0.0);
    }

    #[test]
    fn test_pivot_excludes_earnings_and_zero_rows() {
        let slice = month_slice(&[
            (-50.0, "Food", "Groceries", "2025-01"),
            (0.0, "Transfer", "Internal", "2025-01"),
            (900.0, "Income", "Salary", "2025-01"),
        ]);
        let pivot = Report::new(&slice).expenses_by_category().unwrap();
        // Food + Total rows only
        assert_eq!(pivot.len(), 2);
        assert_eq!(pivot.rows()[0][0], Cell::Text("Food".to_string()));
    }
}
