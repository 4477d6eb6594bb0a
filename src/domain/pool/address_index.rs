//! Pool address index - discovery results keyed by pool identity

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::pool::identity::{pool_identity_for_units, PoolIdentity};
use crate::shared::errors::AssetError;

/// Where a pool lives and which units it trades
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolAddressEntry {
    /// Full address of the pool, other pools may share it
    pub address: String,
    pub unit_a: String,
    pub unit_b: String,
    pub unit_lp: String,
}

/// Caller-owned mapping from pool identity to address entry.
///
/// Serializes as a JSON object keyed by identity hex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolAddressIndex {
    entries: BTreeMap<PoolIdentity, PoolAddressEntry>,
}

impl PoolAddressIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(&mut self, identity: PoolIdentity, entry: PoolAddressEntry) -> Option<PoolAddressEntry> {
        let previous = self.entries.insert(identity, entry);
        if let Some(previous) = &previous {
            warn!("Pool {} re-indexed, replacing address {}", identity, previous.address);
        }
        previous
    }

    pub fn get(&self, identity: &PoolIdentity) -> Option<&PoolAddressEntry> {
        self.entries.get(identity)
    }

    /// Look up a pair in either order
    pub fn lookup(&self, unit_a: &str, unit_b: &str) -> Result<Option<(PoolIdentity, &PoolAddressEntry)>, AssetError> {
        let identity = pool_identity_for_units(unit_a, unit_b)?;
        Ok(self.entries.get(&identity).map(|entry| (identity, entry)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PoolIdentity, &PoolAddressEntry)> {
        self.entries.iter()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
