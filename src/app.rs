// src/app.rs
use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use clap::Subcommand;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use utxo_pools::application::discovery::{DiscoveryOptions, PoolDiscovery};
use utxo_pools::application::services::PoolService;
use utxo_pools::domain::pool::{PoolAddressIndex, PoolConstants, PoolType};
use utxo_pools::infrastructure::{JsonDatumDecoder, SnapshotIndexer};

use crate::config::Config;
use crate::report::{self, DiscoveryReport, PoolStateReport, PriceReport, QuoteReport};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build the pool address index from the snapshot
    Discover {
        /// Write the index as JSON to this file
        #[arg(long)]
        out: Option<String>,
    },
    /// Print the reconciled state of the pool trading two units
    State { unit_a: String, unit_b: String },
    /// Quote a swap of `amount` (whole tokens) from one unit into another
    Quote {
        unit_from: String,
        amount: String,
        unit_to: String,
    },
    /// Price of a token in the native currency
    Price { unit: String },
}

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub constants: PoolConstants,
    pub discovery: DiscoveryOptions,
    pub snapshot_path: String,
    pub address_map_path: Option<String>,
}

impl AppCfg {
    pub fn from_config(mut cfg: Config, fee_bps: Option<u32>, pool_type: Option<PoolType>) -> Result<Self> {
        if pool_type.is_some() {
            cfg.dex.pool_type = pool_type;
        }
        let mut constants = cfg.pool_constants()?;
        if let Some(fee_bps) = fee_bps {
            constants.swap_fee_bps = fee_bps;
        }

        Ok(Self {
            constants,
            discovery: cfg.discovery_options(),
            snapshot_path: cfg.source.snapshot,
            address_map_path: cfg.source.address_map,
        })
    }
}

pub async fn run(app_cfg: AppCfg, command: Command) -> Result<()> {
    info!(
        "Pool type {}, fee {} bps, snapshot {}",
        app_cfg.constants.pool_type, app_cfg.constants.swap_fee_bps, app_cfg.snapshot_path
    );
    let indexer = Arc::new(SnapshotIndexer::from_file(&app_cfg.snapshot_path)?);
    let decoder = Arc::new(JsonDatumDecoder);
    let discovery = PoolDiscovery::new(
        indexer.clone(),
        decoder.clone(),
        app_cfg.constants.clone(),
        app_cfg.discovery,
    );

    let output = match command {
        Command::Discover { out } => {
            let index = discovery.load_address_index().await?;
            if let Some(path) = &out {
                std::fs::write(path, index.to_json()?).with_context(|| format!("write {}", path))?;
                info!("Address index written to {}", path);
            }
            report::to_json(&DiscoveryReport {
                pools: index.len(),
                written_to: out,
                timestamp: chrono::Utc::now(),
            })?
        }
        Command::State { unit_a, unit_b } => {
            let index = load_index(&app_cfg, &discovery).await?;
            let service = PoolService::new(indexer.clone(), indexer, decoder, app_cfg.constants.clone(), index);
            let state = service.pool_state(&unit_a, &unit_b).await?;
            report::to_json(&PoolStateReport::new(app_cfg.constants.pool_type, state.as_ref()))?
        }
        Command::Quote {
            unit_from,
            amount,
            unit_to,
        } => {
            let amount_from = BigDecimal::from_str(&amount).with_context(|| format!("parse amount {}", amount))?;
            let index = load_index(&app_cfg, &discovery).await?;
            let service = PoolService::new(indexer.clone(), indexer, decoder, app_cfg.constants.clone(), index);
            let quote = service
                .compute_expected_swap_amount(&unit_from, &amount_from, &unit_to)
                .await?;
            report::to_json(&QuoteReport {
                pool_type: app_cfg.constants.pool_type,
                unit_from,
                unit_to,
                amount_from: amount,
                fee_bps: app_cfg.constants.swap_fee_bps,
                quote,
                timestamp: chrono::Utc::now(),
            })?
        }
        Command::Price { unit } => {
            let index = load_index(&app_cfg, &discovery).await?;
            let service = PoolService::new(indexer.clone(), indexer, decoder, app_cfg.constants.clone(), index);
            let price = service.native_price(&unit).await?;
            report::to_json(&PriceReport {
                unit,
                price,
                timestamp: chrono::Utc::now(),
            })?
        }
    };

    println!("{}", output);
    Ok(())
}

/// Stored address index if configured, otherwise a fresh discovery run
async fn load_index(app_cfg: &AppCfg, discovery: &PoolDiscovery) -> Result<PoolAddressIndex> {
    match &app_cfg.address_map_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path))?;
            let index = PoolAddressIndex::from_json(&raw).with_context(|| format!("parse address index {}", path))?;
            info!("Loaded {} pools from {}", index.len(), path);
            Ok(index)
        }
        None => Ok(discovery.load_address_index().await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides() {
        let cfg = Config::from_toml(
            r#"
            [dex]
            lp_policy_id = "980e8c567670d34d4ec13a0c3b6de6199f260ae5dc9dc9e867bc5c93"
            amplification = "50"

            [source]
            snapshot = "snapshot.json"
            "#,
        )
        .unwrap();

        let plain = AppCfg::from_config(cfg.clone(), None, None).unwrap();
        assert_eq!(plain.constants.pool_type, PoolType::ConstantProduct);
        assert_eq!(plain.constants.swap_fee_bps, 35);

        let overridden = AppCfg::from_config(cfg, Some(6), Some(PoolType::Stableswap)).unwrap();
        assert_eq!(overridden.constants.pool_type, PoolType::Stableswap);
        assert_eq!(overridden.constants.swap_fee_bps, 6);
        assert_eq!(overridden.snapshot_path, "snapshot.json");
    }
}
