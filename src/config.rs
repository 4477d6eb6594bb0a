use anyhow::{anyhow, Context, Result};
use num_bigint::BigUint;
use serde::Deserialize;
use std::{fs, path::Path};

use utxo_pools::application::discovery::{DiscoveryOptions, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use utxo_pools::domain::pool::state::VALIDITY_ASSET_NAME_HEX;
use utxo_pools::domain::pool::{CandidatePolicy, PoolConstants, PoolType};
use utxo_pools::domain::swap::stableswap::parse_amplification;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DexCfg {
    pub pool_type: Option<PoolType>,
    pub lp_policy_id: Option<String>,
    pub validity_asset: Option<String>,
    pub swap_fee_bps: Option<u32>,
    pub min_deposit: Option<u64>,
    /// Amplification coefficient as a decimal string, stableswap only
    pub amplification: Option<String>,
    pub candidate_policy: CandidatePolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscoveryCfg {
    pub max_pages: Option<u32>,
    pub page_size: Option<u32>,
    pub slow_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceCfg {
    /// JSON ledger snapshot
    pub snapshot: String,
    /// Previously discovered address index; discovery runs when absent
    pub address_map: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dex: DexCfg,
    #[serde(default)]
    pub discovery: DiscoveryCfg,
    pub source: SourceCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse Config.toml")?;
        Ok(cfg)
    }

    /// Venue constants, starting from the live constant-product venue
    pub fn pool_constants(&self) -> Result<PoolConstants> {
        let dex = &self.dex;
        let mut constants = match dex.pool_type.unwrap_or(PoolType::ConstantProduct) {
            PoolType::ConstantProduct => PoolConstants::constant_product(),
            PoolType::Stableswap => {
                let policy = dex
                    .lp_policy_id
                    .as_deref()
                    .ok_or_else(|| anyhow!("stableswap requires dex.lp_policy_id"))?;
                let raw = dex
                    .amplification
                    .as_deref()
                    .ok_or_else(|| anyhow!("stableswap requires dex.amplification"))?;
                let a = parse_amplification(raw).context("dex.amplification")?;
                PoolConstants::stableswap(policy, a)
            }
        };

        if let Some(policy) = &dex.lp_policy_id {
            constants.validity_asset = format!("{}{}", policy, VALIDITY_ASSET_NAME_HEX);
            constants.lp_policy_id = policy.clone();
        }
        if let Some(validity_asset) = &dex.validity_asset {
            constants.validity_asset = validity_asset.clone();
        }
        if let Some(fee) = dex.swap_fee_bps {
            constants.swap_fee_bps = fee;
        }
        if let Some(min_deposit) = dex.min_deposit {
            constants.min_deposit = BigUint::from(min_deposit);
        }
        constants.candidate_policy = dex.candidate_policy;
        Ok(constants)
    }

    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            max_pages: self.discovery.max_pages.unwrap_or(DEFAULT_MAX_PAGES),
            page_size: self.discovery.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            slow_mode: self.discovery.slow_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_live_venue() {
        let cfg = Config::from_toml(
            r#"
            [source]
            snapshot = "snapshot.json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.pool_constants().unwrap(), PoolConstants::constant_product());
        assert_eq!(cfg.discovery_options(), DiscoveryOptions::default());
        assert_eq!(cfg.source.address_map, None);
    }

    #[test]
    fn test_stableswap_config() {
        let cfg = Config::from_toml(
            r#"
            [dex]
            pool_type = "stableswap"
            lp_policy_id = "980e8c567670d34d4ec13a0c3b6de6199f260ae5dc9dc9e867bc5c93"
            amplification = "100"
            swap_fee_bps = 6
            candidate_policy = "last_wins"

            [discovery]
            page_size = 50
            slow_mode = true

            [source]
            snapshot = "snapshot.json"
            address_map = "pools.json"
            "#,
        )
        .unwrap();
        let constants = cfg.pool_constants().unwrap();
        assert_eq!(constants.pool_type, PoolType::Stableswap);
        assert_eq!(
            constants.validity_asset,
            "980e8c567670d34d4ec13a0c3b6de6199f260ae5dc9dc9e867bc5c934c"
        );
        assert_eq!(constants.swap_fee_bps, 6);
        assert_eq!(constants.candidate_policy, CandidatePolicy::LastWins);
        assert!(constants.amplification.is_some());

        let options = cfg.discovery_options();
        assert_eq!(options.page_size, 50);
        assert_eq!(options.max_pages, 20);
        assert!(options.slow_mode);
    }

    #[test]
    fn test_stableswap_requires_amplification() {
        let cfg = Config::from_toml(
            r#"
            [dex]
            pool_type = "stableswap"
            lp_policy_id = "980e8c567670d34d4ec13a0c3b6de6199f260ae5dc9dc9e867bc5c93"

            [source]
            snapshot = "snapshot.json"
            "#,
        )
        .unwrap();
        assert!(cfg.pool_constants().is_err());
    }

    #[test]
    fn test_missing_source_is_rejected() {
        assert!(Config::from_toml("[dex]\nswap_fee_bps = 30\n").is_err());
    }
}
