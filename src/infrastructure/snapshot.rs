//! In-memory indexer backed by a JSON ledger snapshot

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::asset::{NATIVE_DECIMALS, NATIVE_UNIT};
use crate::infrastructure::indexer::{AddressHolding, AssetMetadata, ChainIndexer, Utxo};
use crate::shared::errors::IndexerError;

/// Ledger snapshot: UTxOs per address, datums by hash and token decimals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub utxos: BTreeMap<String, Vec<Utxo>>,
    /// Datums as stored JSON documents, handed out as their serialized bytes
    #[serde(default)]
    pub datums: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub decimals: BTreeMap<String, u8>,
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotIndexer {
    snapshot: Snapshot,
}

impl SnapshotIndexer {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json).context("parse ledger snapshot")?;
        Ok(Self::new(snapshot))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).with_context(|| format!("read snapshot {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Addresses holding `unit`, sorted, with the summed quantity
    fn holders(&self, unit: &str) -> Result<Vec<AddressHolding>, IndexerError> {
        let mut holders = Vec::new();
        for (address, utxos) in &self.snapshot.utxos {
            if !utxos.iter().any(|utxo| utxo.holds(unit)) {
                continue;
            }
            let mut total = BigUint::default();
            for utxo in utxos {
                let value = utxo
                    .value()
                    .map_err(|e| IndexerError::RequestFailed(format!("{} in {}: {}", address, utxo.reference(), e)))?;
                total += value.quantity(unit);
            }
            holders.push(AddressHolding {
                address: address.clone(),
                quantity: total.to_string(),
            });
        }
        Ok(holders)
    }
}

#[async_trait]
impl ChainIndexer for SnapshotIndexer {
    async fn assets_addresses(&self, unit: &str, page: u32, count: u32) -> Result<Vec<AddressHolding>, IndexerError> {
        if page == 0 {
            return Err(IndexerError::RequestFailed("pages are numbered from 1".to_string()));
        }
        let skip = (page as usize - 1).saturating_mul(count as usize);
        Ok(self.holders(unit)?.into_iter().skip(skip).take(count as usize).collect())
    }

    async fn addresses_utxos_asset(&self, address: &str, unit: &str) -> Result<Vec<Utxo>, IndexerError> {
        Ok(self
            .snapshot
            .utxos
            .get(address)
            .map(|utxos| utxos.iter().filter(|utxo| utxo.holds(unit)).cloned().collect())
            .unwrap_or_default())
    }

    async fn datum(&self, datum_hash: &str) -> Result<Vec<u8>, IndexerError> {
        let datum = self
            .snapshot
            .datums
            .get(datum_hash)
            .ok_or_else(|| IndexerError::DatumNotFound(datum_hash.to_string()))?;
        serde_json::to_vec(datum).map_err(|e| IndexerError::RequestFailed(e.to_string()))
    }
}

#[async_trait]
impl AssetMetadata for SnapshotIndexer {
    async fn decimals(&self, unit: &str) -> Result<u8, IndexerError> {
        if unit == NATIVE_UNIT {
            return Ok(NATIVE_DECIMALS);
        }
        match self.snapshot.decimals.get(unit) {
            Some(decimals) => Ok(*decimals),
            None => {
                debug!("No decimals registered for {}, assuming 0", unit);
                Ok(0)
            }
        }
    }
}
