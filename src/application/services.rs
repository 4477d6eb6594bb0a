//! Application services - pool state, swap quotes and native prices

use std::sync::Arc;

use bigdecimal::BigDecimal;
use futures::future::try_join_all;
use num_traits::{ToPrimitive, Zero};
use tracing::{debug, info};

use crate::domain::asset::{AssetClass, NATIVE_DECIMALS, NATIVE_UNIT};
use crate::domain::pool::{
    CandidateDatum, PoolAddressIndex, PoolCandidate, PoolConstants, PoolState, ReserveReconciler,
};
use crate::domain::swap::{expected_raw_swap_amount, SwapParams, SwapQuote};
use crate::infrastructure::{AssetMetadata, ChainIndexer, DatumDecoder, Utxo};
use crate::shared::errors::{AppError, IndexerError, QuoteError};
use crate::shared::utils::{from_raw_amount, pow10, to_decimal, to_raw_amount};

/// Read-only queries against the pools of one venue.
///
/// The address index is owned by the caller and handed in; the service never
/// refreshes it on its own.
pub struct PoolService {
    indexer: Arc<dyn ChainIndexer>,
    metadata: Arc<dyn AssetMetadata>,
    decoder: Arc<dyn DatumDecoder>,
    constants: PoolConstants,
    index: PoolAddressIndex,
}

impl PoolService {
    pub fn new(
        indexer: Arc<dyn ChainIndexer>,
        metadata: Arc<dyn AssetMetadata>,
        decoder: Arc<dyn DatumDecoder>,
        constants: PoolConstants,
        index: PoolAddressIndex,
    ) -> Self {
        Self {
            indexer,
            metadata,
            decoder,
            constants,
            index,
        }
    }

    pub fn constants(&self) -> &PoolConstants {
        &self.constants
    }

    pub fn index(&self) -> &PoolAddressIndex {
        &self.index
    }

    pub fn set_index(&mut self, index: PoolAddressIndex) {
        info!("Address index replaced: {} pools", index.len());
        self.index = index;
    }

    /// Current reserves of the pool trading `unit_a` against `unit_b`, in either order.
    /// `None` when the pair is not indexed or no UTxO validates.
    pub async fn pool_state(&self, unit_a: &str, unit_b: &str) -> Result<Option<PoolState>, AppError> {
        let Some((identity, entry)) = self.index.lookup(unit_a, unit_b)? else {
            debug!("No indexed pool for {} / {}", unit_a, unit_b);
            return Ok(None);
        };

        let utxos = self.indexer.addresses_utxos_asset(&entry.address, &entry.unit_lp).await?;
        let candidates = try_join_all(utxos.iter().map(|utxo| self.candidate(utxo))).await?;

        let state = ReserveReconciler::new(&self.constants).reconcile(&identity, entry, &candidates)?;
        Ok(state)
    }

    async fn candidate(&self, utxo: &Utxo) -> Result<PoolCandidate, AppError> {
        let datum = match utxo.data_hash.as_deref() {
            None => CandidateDatum::Missing,
            Some(hash) => match self.indexer.datum(hash).await {
                Ok(bytes) => match self.decoder.decode(&bytes) {
                    Ok(datum) => CandidateDatum::Decoded(datum),
                    Err(e) => CandidateDatum::Undecodable(e),
                },
                Err(IndexerError::DatumNotFound(_)) => CandidateDatum::Missing,
                Err(e) => return Err(e.into()),
            },
        };
        Ok(PoolCandidate {
            reference: utxo.reference(),
            value: utxo.value()?,
            datum,
        })
    }

    /// Quote swapping `amount_from` (decimal, in token units) of `unit_from` into `unit_to`
    pub async fn compute_expected_swap_amount(
        &self,
        unit_from: &str,
        amount_from: &BigDecimal,
        unit_to: &str,
    ) -> Result<SwapQuote, AppError> {
        if *amount_from <= BigDecimal::zero() {
            return Err(QuoteError::NonPositiveSwapAmount.into());
        }
        let unit_from = &canonical_unit(unit_from)?;
        let unit_to = &canonical_unit(unit_to)?;
        let state = self
            .pool_state(unit_from, unit_to)
            .await?
            .ok_or_else(|| QuoteError::PoolNotFound(format!("{} / {}", unit_from, unit_to)))?;

        let decimals_from = self.metadata.decimals(unit_from).await?;
        let decimals_to = self.metadata.decimals(unit_to).await?;

        let swap_raw = to_raw_amount(amount_from, decimals_from)
            .ok_or_else(|| QuoteError::InvalidSwapAmount(amount_from.to_string()))?;
        let (lp_from, lp_to) = state.oriented_reserves(unit_from);
        let params = SwapParams::new(lp_from.clone(), lp_to.clone(), swap_raw, self.constants.swap_fee_bps);

        let expected_raw = expected_raw_swap_amount(&self.constants, &params)?;
        debug!(
            "Quote {} {} -> {} {} on {}",
            params.swap_raw, unit_from, expected_raw, unit_to, state.address
        );

        Ok(SwapQuote {
            swap_raw_amount: params.swap_raw.to_string(),
            expected_raw_amount: expected_raw.to_string(),
            expected_amount: from_raw_amount(&expected_raw, decimals_to),
        })
    }

    /// Price of one whole `unit` token in the native currency.
    /// `None` when no pool against the native asset resolves or it holds none of the token.
    pub async fn native_price(&self, unit: &str) -> Result<Option<f64>, AppError> {
        let unit = &canonical_unit(unit)?;
        let Some(state) = self.pool_state(NATIVE_UNIT, unit).await? else {
            return Ok(None);
        };
        let (native, token) = state.oriented_reserves(NATIVE_UNIT);
        if token.is_zero() {
            debug!("Pool {} holds no {}", state.address, unit);
            return Ok(None);
        }

        let decimals = self.metadata.decimals(unit).await?;
        let price = to_decimal(native) * pow10(decimals as u32) / (to_decimal(token) * pow10(NATIVE_DECIMALS as u32));
        Ok(price.to_f64())
    }
}

/// Lower-case hex form of a unit, as stored in pool states and metadata
fn canonical_unit(unit: &str) -> Result<String, AppError> {
    Ok(AssetClass::from_unit(unit)?.to_unit())
}
