//! Pool discovery - builds the pool address index from the indexer

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};

use crate::domain::asset::order_canonical;
use crate::domain::pool::{PoolAddressEntry, PoolAddressIndex, PoolConstants, PoolIdentity};
use crate::infrastructure::{ChainIndexer, DatumDecoder};
use crate::shared::errors::{AppError, IndexerError};

pub const DEFAULT_MAX_PAGES: u32 = 20;
pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    pub max_pages: u32,
    pub page_size: u32,
    /// Fetch pool addresses one at a time instead of concurrently
    pub slow_mode: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            page_size: DEFAULT_PAGE_SIZE,
            slow_mode: false,
        }
    }
}

pub struct PoolDiscovery {
    indexer: Arc<dyn ChainIndexer>,
    decoder: Arc<dyn DatumDecoder>,
    constants: PoolConstants,
    options: DiscoveryOptions,
}

impl PoolDiscovery {
    pub fn new(
        indexer: Arc<dyn ChainIndexer>,
        decoder: Arc<dyn DatumDecoder>,
        constants: PoolConstants,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            indexer,
            decoder,
            constants,
            options,
        }
    }

    /// Scan every address holding the validity token and index the pools found there
    pub async fn load_address_index(&self) -> Result<PoolAddressIndex, AppError> {
        let addresses = self.pool_addresses().await?;
        info!("Found {} pool addresses", addresses.len());

        let mut found = Vec::with_capacity(addresses.len());
        if self.options.slow_mode {
            for address in &addresses {
                found.push(self.entries_at(address).await?);
            }
        } else {
            for entries in join_all(addresses.iter().map(|address| self.entries_at(address))).await {
                found.push(entries?);
            }
        }

        let mut index = PoolAddressIndex::new();
        for (identity, entry) in found.into_iter().flatten() {
            index.insert(identity, entry);
        }
        info!("Indexed {} pools", index.len());
        Ok(index)
    }

    async fn pool_addresses(&self) -> Result<Vec<String>, AppError> {
        let mut addresses = Vec::new();
        for page in 1..=self.options.max_pages {
            let holders = self
                .indexer
                .assets_addresses(&self.constants.validity_asset, page, self.options.page_size)
                .await?;
            let short = (holders.len() as u32) < self.options.page_size;
            debug!("Page {}: {} addresses", page, holders.len());
            addresses.extend(holders.into_iter().map(|holder| holder.address));
            if short {
                break;
            }
        }
        Ok(addresses)
    }

    async fn entries_at(&self, address: &str) -> Result<Vec<(PoolIdentity, PoolAddressEntry)>, AppError> {
        let utxos = self
            .indexer
            .addresses_utxos_asset(address, &self.constants.validity_asset)
            .await?;

        let mut entries = Vec::new();
        for utxo in utxos {
            let Some(hash) = utxo.data_hash.as_deref() else {
                debug!("UTxO {} has no datum, skipping", utxo.reference());
                continue;
            };
            let bytes = match self.indexer.datum(hash).await {
                Ok(bytes) => bytes,
                Err(IndexerError::DatumNotFound(_)) => {
                    debug!("Datum {} of UTxO {} not found, skipping", hash, utxo.reference());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let datum = match self.decoder.decode(&bytes) {
                Ok(datum) => datum,
                Err(e) => {
                    debug!("Undecodable datum on UTxO {}: {}", utxo.reference(), e);
                    continue;
                }
            };

            let identity = datum.identity();
            let (first, second) = order_canonical(datum.asset_a, datum.asset_b);
            entries.push((
                identity,
                PoolAddressEntry {
                    address: address.to_string(),
                    unit_a: first.to_unit(),
                    unit_b: second.to_unit(),
                    unit_lp: self.constants.lp_unit(&identity.to_hex()),
                },
            ));
        }
        Ok(entries)
    }
}
