//! Pool identity - order independent hash of an asset pair

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::domain::asset::{order_canonical, AssetClass};
use crate::shared::errors::AssetError;

pub const IDENTITY_LEN: usize = 32;

/// SHA3-256 identity of an unordered asset pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolIdentity([u8; IDENTITY_LEN]);

impl PoolIdentity {
    pub fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

fn sha3_256(chunks: &[&[u8]]) -> [u8; IDENTITY_LEN] {
    let mut hasher = Sha3_256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}

/// `SHA3-256(policyId ‖ assetName)`
pub fn asset_hash(asset: &AssetClass) -> [u8; IDENTITY_LEN] {
    sha3_256(&[asset.policy_id(), asset.asset_name()])
}

/// Identity of the pool trading `x` against `y`. The arguments may be given
/// in either order.
pub fn pool_identity(x: &AssetClass, y: &AssetClass) -> PoolIdentity {
    let (first, second) = order_canonical(x.clone(), y.clone());
    PoolIdentity(sha3_256(&[&asset_hash(&first)[..], &asset_hash(&second)[..]]))
}

/// Identity straight from two unit strings
pub fn pool_identity_for_units(unit_a: &str, unit_b: &str) -> Result<PoolIdentity, AssetError> {
    let a = AssetClass::from_unit(unit_a)?;
    let b = AssetClass::from_unit(unit_b)?;
    Ok(pool_identity(&a, &b))
}

impl fmt::Display for PoolIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for PoolIdentity {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| AssetError::InvalidIdentity(format!("{}: {}", s, e)))?;
        let bytes: [u8; IDENTITY_LEN] = bytes
            .try_into()
            .map_err(|_| AssetError::InvalidIdentity(format!("{} is not {} bytes", s, IDENTITY_LEN)))?;
        Ok(Self(bytes))
    }
}

// Serialized as hex so it can key a JSON map
impl Serialize for PoolIdentity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PoolIdentity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const POLICY: &str = "026a18d04a0c642759bb3d83b12e3344894e5c1c7b2aeb1a2113a570";

    #[test]
    fn test_native_asset_hash() {
        // SHA3-256 of the empty string
        assert_eq!(
            hex::encode(asset_hash(&AssetClass::native())),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_pool_identity_fixture() {
        let token = AssetClass::from_unit(&format!("{}4c", POLICY)).unwrap();
        let expected = "2302583fa7c29e33f198913f5875b8202f05cd0765d32390554fd466051faca3";
        assert_eq!(pool_identity(&AssetClass::native(), &token).to_hex(), expected);
        assert_eq!(pool_identity(&token, &AssetClass::native()).to_hex(), expected);
        assert_eq!(
            pool_identity_for_units(&format!("{}4c", POLICY), "lovelace").unwrap().to_hex(),
            expected
        );
    }

    #[test]
    fn test_distinct_pairs_differ() {
        let a = AssetClass::from_unit(&format!("{}41", POLICY)).unwrap();
        let b = AssetClass::from_unit(&format!("{}42", POLICY)).unwrap();
        let native = AssetClass::native();
        assert_ne!(pool_identity(&native, &a), pool_identity(&native, &b));
        assert_ne!(pool_identity(&native, &a), pool_identity(&a, &b));
    }

    #[test]
    fn test_identity_hex_roundtrip() {
        let id = pool_identity(&AssetClass::native(), &AssetClass::from_unit(POLICY).unwrap());
        assert_eq!(id.to_hex().parse::<PoolIdentity>().unwrap(), id);
        assert!("abcd".parse::<PoolIdentity>().is_err());
        assert!("zz".parse::<PoolIdentity>().is_err());
    }

    fn arb_asset() -> impl Strategy<Value = AssetClass> {
        prop_oneof![
            Just(AssetClass::native()),
            (
                proptest::collection::vec(any::<u8>(), 28),
                proptest::collection::vec(any::<u8>(), 0..=32)
            )
                .prop_map(|(policy, name)| AssetClass::new(policy, name).unwrap()),
        ]
    }

    proptest! {
        #[test]
        fn prop_identity_is_symmetric(x in arb_asset(), y in arb_asset()) {
            prop_assert_eq!(pool_identity(&x, &y), pool_identity(&y, &x));
        }
    }
}
