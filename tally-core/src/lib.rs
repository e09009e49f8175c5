//! tally-core: shared table model, canonical schema, and error taxonomy
//! for the statement normalization pipeline.

pub mod error;
pub mod schema;
pub mod table;

pub use error::{Error, Result};
pub use schema::{REQUIRED_COLUMNS, YEAR_MONTH};
pub use table::{Cell, Table};
