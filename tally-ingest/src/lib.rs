//! tally-ingest: statement loading, per-account column mapping, and the
//! bank-variant normalization pipeline.

pub mod loader;
pub mod mapping;
pub mod normalize;

pub use loader::load_statement;
pub use mapping::{ColumnMapping, SectionLookup, resolve};
pub use normalize::{Bank, normalize};
