// Catalog Store - in-memory catalog of all Deathbats
//
// Loaded once at startup, immutable afterwards. The catalog is an explicit
// value passed by reference into the matcher and the transports - never
// ambient global state - so it can be shared read-only across concurrent
// queries and swapped for synthetic fixtures in tests.

use crate::error::TwinError;
use crate::profile::{RawAttribute, TraitProfile};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// Marketplace asset contract for the collection; the per-record hyperlink
/// is derived from it at load time.
pub const MARKETPLACE_ASSET_URL: &str =
    "https://opensea.io/assets/0x1D3aDa5856B14D9dF178EA5Cab137d436dC55F1D";

// ============================================================================
// DEATHBAT RECORD
// ============================================================================

/// One catalog entry. `id` is the sole equality and lookup key and never
/// changes once assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deathbat {
    pub id: u32,

    #[serde(default)]
    pub name: String,

    /// Freeform in the source data (string, null, or structured).
    #[serde(default)]
    pub description: serde_json::Value,

    #[serde(default)]
    pub minted: bool,

    #[serde(default)]
    pub image: String,

    /// Ordered raw (trait_type, value) pairs as ingested.
    #[serde(default)]
    pub attributes: Vec<RawAttribute>,

    /// Derived at load time from `attributes`; read-only afterwards.
    #[serde(default)]
    pub traits: TraitProfile,

    /// Derived marketplace link.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hyperlink: String,

    /// Resolved by the owner enrichment step, outside the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl Deathbat {
    /// Raw attributes as a single display line, e.g.
    /// `Background: Crimson, Mask: Gas Mask`.
    pub fn attribute_summary(&self) -> String {
        self.attributes
            .iter()
            .map(|attr| format!("{}: {}", attr.trait_type, attr.value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// The full collection, indexed by record id.
///
/// `from_records` profiles every record exactly once and builds the id map;
/// lookup is correct for out-of-order and sparse id ranges (the source data
/// happens to be dense and sorted, but that is not a contract).
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<Deathbat>,
    index: HashMap<u32, usize>,
}

impl Catalog {
    /// Build a catalog: derive every trait profile, derive hyperlinks, and
    /// index by id. Fails with `UnknownTraitType` if any record carries an
    /// attribute category outside the recognized set.
    pub fn from_records(mut records: Vec<Deathbat>) -> Result<Self, TwinError> {
        for record in &mut records {
            record.traits = TraitProfile::extract(&record.attributes)?;
            if record.hyperlink.is_empty() {
                record.hyperlink = format!("{}/{}", MARKETPLACE_ASSET_URL, record.id);
            }
        }

        let index = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.id, position))
            .collect();

        Ok(Catalog { records, index })
    }

    /// Read the catalog JSON file (an array of records) and build the
    /// catalog. This is the single ingestion point; no record is added,
    /// removed, or mutated after it returns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;

        let records: Vec<Deathbat> = serde_json::from_str(&data)
            .with_context(|| format!("failed to parse catalog file {}", path.display()))?;

        let catalog = Catalog::from_records(records)
            .with_context(|| format!("failed to profile catalog file {}", path.display()))?;

        Ok(catalog)
    }

    /// Point lookup by id. `NotFound` when absent; no side effects.
    pub fn lookup(&self, id: u32) -> Result<&Deathbat, TwinError> {
        self.index
            .get(&id)
            .map(|&position| &self.records[position])
            .ok_or(TwinError::NotFound(id))
    }

    /// All records in catalog (insertion) order. The matcher scans in this
    /// order, which makes its degenerate tie-break reproducible.
    pub fn records(&self) -> &[Deathbat] {
        &self.records
    }

    /// Smallest and largest id present, for transport-side validation of
    /// incoming token ids. `None` for an empty catalog.
    pub fn id_range(&self) -> Option<RangeInclusive<u32>> {
        let min = self.index.keys().min()?;
        let max = self.index.keys().max()?;
        Some(*min..=*max)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
