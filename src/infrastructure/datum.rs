//! Datum decoding seam

use serde::Deserialize;

use crate::domain::asset::AssetClass;
use crate::domain::pool::PoolDatum;
use crate::shared::errors::DecodeError;
use crate::shared::types::{AssetAmount, Value};

/// Turns raw datum bytes into the pool datum fields
pub trait DatumDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<PoolDatum, DecodeError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonPoolDatum {
    asset_a: String,
    asset_b: String,
    #[serde(default)]
    treasury: Vec<AssetAmount>,
}

/// Decoder for datums stored as JSON in a ledger snapshot:
///
/// ```json
/// {"assetA": "lovelace", "assetB": "<unit>", "treasury": [{"unit": "lovelace", "quantity": "3000000"}]}
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDatumDecoder;

impl DatumDecoder for JsonDatumDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PoolDatum, DecodeError> {
        let raw: JsonPoolDatum =
            serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let treasury = Value::from_amounts(&raw.treasury).map_err(|e| DecodeError::Malformed(e.to_string()))?;
        Ok(PoolDatum {
            asset_a: AssetClass::from_unit(&raw.asset_a)?,
            asset_b: AssetClass::from_unit(&raw.asset_b)?,
            treasury,
        })
    }
}
