//! tally-report: merges normalized statements into one transaction set
//! and derives monthly earnings/expense views from it.

pub mod processor;
pub mod report;

pub use processor::{group_by_month, merge, with_year_month};
pub use report::Report;
