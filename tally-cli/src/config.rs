//! TOML run configuration.
//!
//! `[accounts]` maps each account id to its statement CSV path; every
//! account also needs a `[<account>_map]` table holding canonical column
//! name → source column name pairs, e.g.:
//!
//! ```toml
//! [accounts]
//! citi = "statements/citi.csv"
//!
//! [citi_map]
//! transaction_date = "Date"
//! amount = "Amount"
//! category = "Category"
//! sub_category = "Sub Category"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use tally_ingest::SectionLookup;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// account id → statement CSV path, iterated in name order.
    pub accounts: BTreeMap<String, PathBuf>,

    /// Remaining top-level tables, notably the `<account>_map` sections.
    #[serde(flatten)]
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config: Config =
            toml::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
        Ok(config)
    }
}

impl SectionLookup for Config {
    fn options_pair(&self, section: &str) -> tally_core::Result<BTreeMap<String, String>> {
        self.sections
            .get(section)
            .cloned()
            .ok_or_else(|| tally_core::Error::ConfigurationMissing {
                section: section.to_string(),
            })
    }
}
