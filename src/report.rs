// src/report.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use utxo_pools::domain::pool::{PoolState, PoolType};
use utxo_pools::domain::swap::SwapQuote;

#[derive(Debug, Serialize, Deserialize)]
pub struct PoolStateReport {
    pub pool_type: PoolType,
    /// `None` when no pool state could be resolved for the pair
    pub pool: Option<PoolStateDetails>,
    pub timestamp: DateTime<Utc>,
}

/// Pool state with quantities as decimal strings
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStateDetails {
    pub address: String,
    pub unit_a: String,
    pub unit_b: String,
    pub unit_lp: String,
    pub quantity_a: String,
    pub quantity_b: String,
    pub issued_lp_tokens: String,
}

impl From<&PoolState> for PoolStateDetails {
    fn from(state: &PoolState) -> Self {
        Self {
            address: state.address.clone(),
            unit_a: state.unit_a.clone(),
            unit_b: state.unit_b.clone(),
            unit_lp: state.unit_lp.clone(),
            quantity_a: state.quantity_a.to_string(),
            quantity_b: state.quantity_b.to_string(),
            issued_lp_tokens: state.issued_lp_tokens.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteReport {
    pub pool_type: PoolType,
    pub unit_from: String,
    pub unit_to: String,
    pub amount_from: String,
    pub fee_bps: u32,
    pub quote: SwapQuote,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceReport {
    pub unit: String,
    /// Native currency per whole token
    pub price: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiscoveryReport {
    pub pools: usize,
    pub written_to: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PoolStateReport {
    pub fn new(pool_type: PoolType, state: Option<&PoolState>) -> Self {
        Self {
            pool_type,
            pool: state.map(PoolStateDetails::from),
            timestamp: Utc::now(),
        }
    }
}

pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
