//! Per-account column mapping, resolved from a `<account>_map`
//! configuration section.
//!
//! Configuration stores canonical name → source name pairs; renaming
//! operates source → canonical, so the mapping is inverted at use time.
//! Duplicate source names are rejected eagerly, because inversion would
//! silently drop one of the colliding entries otherwise.

use std::collections::BTreeMap;

use tally_core::{Error, Result};

/// Key-value lookup over named configuration sections. Implementations
/// must fail with [`Error::ConfigurationMissing`] when the section does
/// not exist; an absent section is not the same as an empty mapping.
pub trait SectionLookup {
    fn options_pair(&self, section: &str) -> Result<BTreeMap<String, String>>;
}

/// Validated column mapping for one account.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    canonical_to_source: BTreeMap<String, String>,
}

impl ColumnMapping {
    /// Build from canonical → source pairs, rejecting duplicate source
    /// columns up front.
    pub fn from_pairs(pairs: BTreeMap<String, String>) -> Result<ColumnMapping> {
        let mut seen: BTreeMap<&String, &String> = BTreeMap::new();
        for (canonical, source) in &pairs {
            if seen.insert(source, canonical).is_some() {
                return Err(Error::AmbiguousMapping {
                    column: source.clone(),
                });
            }
        }
        Ok(ColumnMapping {
            canonical_to_source: pairs,
        })
    }

    pub fn canonical_to_source(&self) -> &BTreeMap<String, String> {
        &self.canonical_to_source
    }

    /// Inverted view used for renaming raw statement columns.
    pub fn source_to_canonical(&self) -> BTreeMap<String, String> {
        self.canonical_to_source
            .iter()
            .map(|(canonical, source)| (source.clone(), canonical.clone()))
            .collect()
    }
}

/// Resolve the column mapping for `account_id` from its `<account_id>_map`
/// configuration section.
pub fn resolve(lookup: &impl SectionLookup, account_id: &str) -> Result<ColumnMapping> {
    let section = format!("{account_id}_map");
    let pairs = lookup.options_pair(&section)?;
    let mapping = ColumnMapping::from_pairs(pairs)?;
    tracing::debug!(
        account = account_id,
        columns = mapping.canonical_to_source().len(),
        "resolved column mapping"
    );
    Ok(mapping)
}
