//! Chain indexer seam - what the engine needs from a UTxO indexer

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::errors::{IndexerError, ReserveError};
use crate::shared::types::{AssetAmount, Value};

/// An address holding some quantity of an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressHolding {
    pub address: String,
    pub quantity: String,
}

/// An unspent output as reported by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    pub tx_hash: String,
    pub output_index: u32,
    pub amount: Vec<AssetAmount>,
    /// Hash of the output datum, if any
    #[serde(default)]
    pub data_hash: Option<String>,
}

impl Utxo {
    /// `txHash#outputIndex`
    pub fn reference(&self) -> String {
        format!("{}#{}", self.tx_hash, self.output_index)
    }

    pub fn value(&self) -> Result<Value, ReserveError> {
        Value::from_amounts(&self.amount)
    }

    pub fn holds(&self, unit: &str) -> bool {
        self.amount.iter().any(|amount| amount.unit == unit)
    }
}

/// Read access to the ledger through an indexer.
///
/// Retries, pagination limits and rate limiting are the implementor's concern.
#[async_trait]
pub trait ChainIndexer: Send + Sync {
    /// Addresses holding `unit`, one page (1-based) of at most `count` entries
    async fn assets_addresses(&self, unit: &str, page: u32, count: u32) -> Result<Vec<AddressHolding>, IndexerError>;

    /// Every UTxO at `address` that holds `unit`
    async fn addresses_utxos_asset(&self, address: &str, unit: &str) -> Result<Vec<Utxo>, IndexerError>;

    /// Raw datum bytes by datum hash
    async fn datum(&self, datum_hash: &str) -> Result<Vec<u8>, IndexerError>;
}

/// Token metadata lookup, used only to scale raw amounts at the edges
#[async_trait]
pub trait AssetMetadata: Send + Sync {
    async fn decimals(&self, unit: &str) -> Result<u8, IndexerError>;
}
