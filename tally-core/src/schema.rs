//! Canonical transaction schema shared by every stage of the pipeline.

/// Columns every normalized statement must carry, in output order.
///
/// `amount` is signed: positive = inflow (earning), negative = outflow
/// (expense). Normalizers are responsible for correcting bank sign
/// conventions so this holds for every row.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "transaction_date",
    "amount",
    "category",
    "sub_category",
    "from_account",
];

/// Name of the derived `YYYY-MM` grouping column added by the processor.
pub const YEAR_MONTH: &str = "year_month";
