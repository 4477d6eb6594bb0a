//! Common types used across the engine

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::shared::errors::ReserveError;

/// One `unit -> quantity` entry as reported by the indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    pub unit: String,
    pub quantity: String,
}

impl AssetAmount {
    pub fn new(unit: impl Into<String>, quantity: impl ToString) -> Self {
        Self {
            unit: unit.into(),
            quantity: quantity.to_string(),
        }
    }
}

/// Multi-asset value keyed by unit string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value(BTreeMap<String, BigUint>);

impl Value {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a value from indexer amounts. Quantities are decimal strings;
    /// repeated units are summed.
    pub fn from_amounts<'a, I>(amounts: I) -> Result<Self, ReserveError>
    where
        I: IntoIterator<Item = &'a AssetAmount>,
    {
        let mut value = Self::new();
        for amount in amounts {
            let quantity = amount.quantity.parse::<BigUint>().map_err(|_| {
                ReserveError::InvalidQuantity {
                    unit: amount.unit.clone(),
                    quantity: amount.quantity.clone(),
                }
            })?;
            value.insert(amount.unit.clone(), quantity);
        }
        Ok(value)
    }

    pub fn insert(&mut self, unit: impl Into<String>, quantity: BigUint) {
        *self.0.entry(unit.into()).or_insert_with(BigUint::zero) += quantity;
    }

    /// Quantity of `unit`, zero when absent
    pub fn quantity(&self, unit: &str) -> BigUint {
        self.0.get(unit).cloned().unwrap_or_else(BigUint::zero)
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.0.contains_key(unit)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BigUint)> {
        self.0.iter()
    }
}
