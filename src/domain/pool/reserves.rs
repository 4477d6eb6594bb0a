//! Reserve reconciliation - raw pool UTxOs to a verified `PoolState`

use num_bigint::BigUint;
use num_traits::CheckedSub;
use tracing::{debug, warn};

use crate::domain::asset::AssetClass;
use crate::domain::pool::address_index::PoolAddressEntry;
use crate::domain::pool::datum::PoolDatum;
use crate::domain::pool::identity::PoolIdentity;
use crate::domain::pool::state::{CandidatePolicy, PoolConstants, PoolState};
use crate::shared::errors::{DecodeError, ReserveError};
use crate::shared::types::Value;

/// Datum attached to a candidate UTxO, as far as the decoder got
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateDatum {
    /// The UTxO carries no datum hash
    Missing,
    Undecodable(DecodeError),
    Decoded(PoolDatum),
}

/// One UTxO at a pool address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolCandidate {
    /// `txHash#outputIndex`
    pub reference: String,
    pub value: Value,
    pub datum: CandidateDatum,
}

/// Why a candidate was not taken as pool state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingValidityToken,
    MissingDatum,
    UndecodableDatum,
    IdentityMismatch,
}

/// Turns candidate UTxOs into a `PoolState`.
///
/// Candidates are validated independently; a skipped candidate never fails
/// the query, arithmetic inconsistencies always do.
pub struct ReserveReconciler<'a> {
    constants: &'a PoolConstants,
}

impl<'a> ReserveReconciler<'a> {
    pub fn new(constants: &'a PoolConstants) -> Self {
        Self { constants }
    }

    /// Validate a single candidate. `Ok(Err(reason))` means skipped.
    pub fn validate(
        &self,
        expected: &PoolIdentity,
        entry: &PoolAddressEntry,
        candidate: &PoolCandidate,
    ) -> Result<Result<PoolState, SkipReason>, ReserveError> {
        if candidate.value.quantity(&self.constants.validity_asset) != BigUint::from(1u32) {
            return Ok(Err(SkipReason::MissingValidityToken));
        }
        let datum = match &candidate.datum {
            CandidateDatum::Missing => return Ok(Err(SkipReason::MissingDatum)),
            CandidateDatum::Undecodable(_) => return Ok(Err(SkipReason::UndecodableDatum)),
            CandidateDatum::Decoded(datum) => datum,
        };
        if datum.identity() != *expected {
            return Ok(Err(SkipReason::IdentityMismatch));
        }

        let asset_a = AssetClass::from_unit(&entry.unit_a)?;
        let asset_b = AssetClass::from_unit(&entry.unit_b)?;

        let mut treasury_a = datum.treasury_of(&asset_a);
        let mut treasury_b = datum.treasury_of(&asset_b);
        if asset_a.is_native() {
            treasury_a += &self.constants.min_deposit;
        } else if asset_b.is_native() {
            treasury_b += &self.constants.min_deposit;
        }

        let quantity_a = checked_sub(&entry.unit_a, &candidate.value.quantity(&entry.unit_a), &treasury_a)?;
        let quantity_b = checked_sub(&entry.unit_b, &candidate.value.quantity(&entry.unit_b), &treasury_b)?;
        let issued_lp_tokens = checked_sub(
            &entry.unit_lp,
            &self.constants.lp_supply_ceiling,
            &candidate.value.quantity(&entry.unit_lp),
        )?;

        Ok(Ok(PoolState {
            address: entry.address.clone(),
            unit_a: entry.unit_a.clone(),
            unit_b: entry.unit_b.clone(),
            unit_lp: entry.unit_lp.clone(),
            quantity_a,
            quantity_b,
            issued_lp_tokens,
        }))
    }

    /// Reduce all candidates at the pool address to at most one state,
    /// resolving several valid ones through the configured `CandidatePolicy`.
    pub fn reconcile(
        &self,
        expected: &PoolIdentity,
        entry: &PoolAddressEntry,
        candidates: &[PoolCandidate],
    ) -> Result<Option<PoolState>, ReserveError> {
        let mut validated = Vec::new();
        for candidate in candidates {
            match self.validate(expected, entry, candidate)? {
                Ok(state) => validated.push(state),
                Err(reason) => debug!("Skipping UTxO {} at {}: {:?}", candidate.reference, entry.address, reason),
            }
        }

        if validated.len() > 1 {
            match self.constants.candidate_policy {
                CandidatePolicy::Strict => {
                    return Err(ReserveError::MultiplePoolCandidates(validated.len()));
                }
                CandidatePolicy::LastWins => {
                    warn!(
                        "{} UTxOs validate for pool {} at {}, keeping the last one",
                        validated.len(),
                        expected,
                        entry.address
                    );
                }
            }
        }
        Ok(validated.pop())
    }
}

fn checked_sub(unit: &str, value: &BigUint, subtrahend: &BigUint) -> Result<BigUint, ReserveError> {
    value.checked_sub(subtrahend).ok_or_else(|| ReserveError::Underflow {
        unit: unit.to_string(),
        value: value.to_string(),
        subtrahend: subtrahend.to_string(),
    })
}
