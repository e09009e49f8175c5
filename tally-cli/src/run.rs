//! Orchestration: config → per-account normalization → merged transaction
//! set → per-month reports.
//!
//! Fail-fast: the first error in any account's statement aborts the whole
//! run. Accounts are processed in name order and months are reported in
//! ascending year-month order, so output is deterministic.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use tally_core::Table;
use tally_ingest::{Bank, load_statement, normalize, resolve};
use tally_report::{Report, group_by_month, merge, with_year_month};

use crate::config::Config;
use crate::output::{Format, render_table, table_to_json};

/// Normalize every configured account and merge into one transaction set
/// with the `year_month` grouping column.
fn unified_transactions(config: &Config) -> Result<Table> {
    let mut tables = Vec::new();
    for (account, path) in &config.accounts {
        let statement = load_statement(path)
            .with_context(|| format!("loading statement for account `{account}`"))?;
        let mapping = resolve(config, account)
            .with_context(|| format!("resolving column mapping for account `{account}`"))?;
        let normalized = normalize(statement, account, &mapping)
            .with_context(|| format!("normalizing statement for account `{account}`"))?;
        tracing::info!(account = %account, rows = normalized.len(), "normalized statement");
        tables.push(normalized);
    }
    let unified = with_year_month(merge(tables)?)?;
    tracing::info!(rows = unified.len(), "unified transaction set ready");
    Ok(unified)
}

fn monthly_slices(config: &Config) -> Result<BTreeMap<String, Table>> {
    Ok(group_by_month(unified_transactions(config)?)?)
}

/// Render the full monthly report for every month found in the
/// configured statements.
pub fn run_report(config_path: &Path, format: Format) -> Result<String> {
    let config = Config::load(config_path)?;
    let months = monthly_slices(&config)?;

    match format {
        Format::Text => {
            let mut sections = Vec::new();
            for (month, slice) in &months {
                let report = Report::new(slice);
                sections.push(format!("== {month} ==\n"));
                sections.push(format!("Earnings:\n{}\n", render_table(&report.earnings()?)));
                sections.push(format!("Expenses:\n{}\n", render_table(&report.expenses()?)));
                sections.push(format!(
                    "Expenses by category:\n{}\n",
                    render_table(&report.expenses_by_category()?)
                ));
                sections.push(format!(
                    "Expenses by sub-category:\n{}\n",
                    render_table(&report.expenses_by_sub_category()?)
                ));
            }
            Ok(sections.join("\n"))
        }
        Format::Json => {
            let mut output = Vec::new();
            for (month, slice) in &months {
                let report = Report::new(slice);
                output.push(json!({
                    "month": month,
                    "earnings": table_to_json(&report.earnings()?),
                    "expenses": table_to_json(&report.expenses()?),
                    "expenses_by_category": table_to_json(&report.expenses_by_category()?),
                    "expenses_by_sub_category": table_to_json(&report.expenses_by_sub_category()?),
                }));
            }
            Ok(serde_json::to_string_pretty(&output)?)
        }
    }
}

/// Validate the configuration without touching any statement file:
/// resolve every account's column mapping and show which bank variant
/// each account routes to.
pub fn run_check(config_path: &Path) -> Result<String> {
    let config = Config::load(config_path)?;
    let mut lines = Vec::new();
    for (account, path) in &config.accounts {
        let mapping = resolve(&config, account)
            .with_context(|| format!("resolving column mapping for account `{account}`"))?;
        let bank = Bank::for_account(account);
        lines.push(format!(
            "{account}: bank={} columns_mapped={} statement={}",
            bank.name(),
            mapping.canonical_to_source().len(),
            path.display(),
        ));
    }
    lines.push(format!("{} account(s) configured", config.accounts.len()));
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CITI_CSV: &str = "\
Date,Description,Category,Sub Category,Debit,Credit
2025-01-10,WHOLE FOODS,Food,Groceries,50.0,
2025-01-12,SHELL OIL,Gas,Fuel,30.0,
2025-02-01,PAYMENT THANK YOU,Payment,Card Payment,,120.0
";

    const CHASE_CSV: &str = "\
Posting Date,Details,Amount,Category,Type
2025-01-15,PAYROLL ACME,900.0,Income,Salary
2025-01-20,TRANSFER TO SAVINGS,0.0,Transfer,Internal
";

    fn write_workspace() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("citi.csv"), CITI_CSV).unwrap();
        fs::write(dir.path().join("chase.csv"), CHASE_CSV).unwrap();
        let config = format!(
            r#"
[accounts]
citi = "{citi}"
chase = "{chase}"

[citi_map]
transaction_date = "Date"
category = "Category"
sub_category = "Sub Category"

[chase_map]
transaction_date = "Posting Date"
amount = "Amount"
category = "Category"
sub_category = "Type"
"#,
            citi = dir.path().join("citi.csv").display(),
            chase = dir.path().join("chase.csv").display(),
        );
        let config_path = dir.path().join("tally.toml");
        fs::write(&config_path, config).unwrap();
        (dir, config_path)
    }

    #[test]
    fn test_end_to_end_report_text() {
        let (_dir, config_path) = write_workspace();
        let output = run_report(&config_path, Format::Text).unwrap();

        // Citi spend is sign-inverted into expenses; Chase is not.
        assert!(output.contains("== 2025-01 =="));
        assert!(output.contains("== 2025-02 =="));
        assert!(output.contains("-50.00"));
        assert!(output.contains("900.00"));
        // The citi credit row is inverted too, per the citi sign convention.
        assert!(output.contains("-120.00"));
        // Pivot totals: Food -50 + Gas -30 in January.
        assert!(output.contains("-80.00"));
    }

    #[test]
    fn test_end_to_end_zero_amount_in_neither_view() {
        let (_dir, config_path) = write_workspace();
        let config = Config::load(&config_path).unwrap();
        let months = monthly_slices(&config).unwrap();

        let january = &months["2025-01"];
        let report = Report::new(january);
        let counted =
            report.earnings().unwrap().len() + report.expenses().unwrap().len();
        // one zero-amount transfer row is excluded from both views
        assert_eq!(counted, january.len() - 1);
    }

    #[test]
    fn test_end_to_end_json_report() {
        let (_dir, config_path) = write_workspace();
        let output = run_report(&config_path, Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed[0]["month"], "2025-01");
        let expenses = parsed[0]["expenses"].as_array().unwrap();
        assert_eq!(expenses.len(), 2);
        assert!(
            expenses
                .iter()
                .all(|row| row["amount"].as_f64().unwrap() < 0.0)
        );
    }

    #[test]
    fn test_check_reports_bank_routing() {
        let (_dir, config_path) = write_workspace();
        let output = run_check(&config_path).unwrap();
        assert!(output.contains("citi: bank=citi"));
        assert!(output.contains("chase: bank=default"));
        assert!(output.contains("2 account(s) configured"));
    }

    #[test]
    fn test_missing_map_section_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("citi.csv"), CITI_CSV).unwrap();
        let config = format!(
            "[accounts]\nciti = \"{}\"\n",
            dir.path().join("citi.csv").display()
        );
        let config_path = dir.path().join("tally.toml");
        fs::write(&config_path, config).unwrap();

        let err = run_report(&config_path, Format::Text).unwrap_err();
        let root = format!("{:#}", err);
        assert!(root.contains("citi_map"), "unexpected error: {root}");
    }
}
