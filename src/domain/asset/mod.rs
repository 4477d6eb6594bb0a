//! Asset domain - fungible asset classes and their canonical order

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::errors::AssetError;

/// Unit string of the chain's native currency
pub const NATIVE_UNIT: &str = "lovelace";

/// Decimals of the native currency
pub const NATIVE_DECIMALS: u8 = 6;

/// Policy ids are 28-byte script hashes
pub const POLICY_ID_HEX_LEN: usize = 56;

/// Maximum asset name length in bytes
pub const MAX_ASSET_NAME_LEN: usize = 32;

/// A fungible asset: the native currency or a policy-scoped token.
///
/// The derived order compares the policy id bytes first and the asset name
/// bytes second, both as unsigned lexicographic byte strings. This is the
/// canonical order pool identities are built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetClass {
    policy_id: Vec<u8>,
    asset_name: Vec<u8>,
}

impl AssetClass {
    /// The native currency sentinel (empty policy id and name)
    pub fn native() -> Self {
        Self {
            policy_id: Vec::new(),
            asset_name: Vec::new(),
        }
    }

    pub fn new(policy_id: Vec<u8>, asset_name: Vec<u8>) -> Result<Self, AssetError> {
        if policy_id.is_empty() && asset_name.is_empty() {
            return Ok(Self::native());
        }
        if policy_id.len() * 2 != POLICY_ID_HEX_LEN {
            return Err(AssetError::InvalidUnit(format!(
                "policy id must be {} bytes, got {}",
                POLICY_ID_HEX_LEN / 2,
                policy_id.len()
            )));
        }
        if asset_name.len() > MAX_ASSET_NAME_LEN {
            return Err(AssetError::InvalidUnit(format!(
                "asset name exceeds {} bytes",
                MAX_ASSET_NAME_LEN
            )));
        }
        Ok(Self {
            policy_id,
            asset_name,
        })
    }

    pub fn from_hex(policy_id_hex: &str, asset_name_hex: &str) -> Result<Self, AssetError> {
        let policy_id = hex::decode(policy_id_hex)
            .map_err(|e| AssetError::InvalidUnit(format!("{}: {}", policy_id_hex, e)))?;
        let asset_name = hex::decode(asset_name_hex)
            .map_err(|e| AssetError::InvalidUnit(format!("{}: {}", asset_name_hex, e)))?;
        Self::new(policy_id, asset_name)
    }

    /// Parse `lovelace` or `policyIdHex ‖ assetNameHex`
    pub fn from_unit(unit: &str) -> Result<Self, AssetError> {
        if unit == NATIVE_UNIT {
            return Ok(Self::native());
        }
        if unit.len() < POLICY_ID_HEX_LEN || !unit.is_ascii() {
            return Err(AssetError::InvalidUnit(unit.to_string()));
        }
        let (policy_id_hex, asset_name_hex) = unit.split_at(POLICY_ID_HEX_LEN);
        Self::from_hex(policy_id_hex, asset_name_hex)
    }

    /// Inverse of [`AssetClass::from_unit`]
    pub fn to_unit(&self) -> String {
        if self.is_native() {
            NATIVE_UNIT.to_string()
        } else {
            format!("{}{}", self.policy_id_hex(), self.asset_name_hex())
        }
    }

    pub fn is_native(&self) -> bool {
        self.policy_id.is_empty() && self.asset_name.is_empty()
    }

    pub fn policy_id(&self) -> &[u8] {
        &self.policy_id
    }

    pub fn asset_name(&self) -> &[u8] {
        &self.asset_name
    }

    pub fn policy_id_hex(&self) -> String {
        hex::encode(&self.policy_id)
    }

    pub fn asset_name_hex(&self) -> String {
        hex::encode(&self.asset_name)
    }
}

/// Canonical comparison of two assets
pub fn compare(a: &AssetClass, b: &AssetClass) -> Ordering {
    a.cmp(b)
}

/// Order a pair canonically, smaller asset first
pub fn order_canonical(x: AssetClass, y: AssetClass) -> (AssetClass, AssetClass) {
    if compare(&x, &y) == Ordering::Greater {
        (y, x)
    } else {
        (x, y)
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_unit())
    }
}

impl FromStr for AssetClass {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_unit(s)
    }
}

impl Serialize for AssetClass {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_unit())
    }
}

impl<'de> Deserialize<'de> for AssetClass {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let unit = String::deserialize(deserializer)?;
        Self::from_unit(&unit).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: &str = "026a18d04a0c642759bb3d83b12e3344894e5c1c7b2aeb1a2113a570";

    #[test]
    fn test_native_unit() {
        let native = AssetClass::from_unit("lovelace").unwrap();
        assert!(native.is_native());
        assert_eq!(native, AssetClass::native());
        assert_eq!(native.to_unit(), "lovelace");
        assert!(native.policy_id().is_empty());
    }

    #[test]
    fn test_token_unit() {
        let unit = format!("{}4c", POLICY);
        let asset = AssetClass::from_unit(&unit).unwrap();
        assert!(!asset.is_native());
        assert_eq!(asset.policy_id_hex(), POLICY);
        assert_eq!(asset.asset_name(), &[0x4c]);
        assert_eq!(asset.to_unit(), unit);

        // empty asset name under a policy is a valid token
        let bare = AssetClass::from_unit(POLICY).unwrap();
        assert!(!bare.is_native());
        assert!(bare.asset_name().is_empty());
    }

    #[test]
    fn test_invalid_units() {
        let bad_units = vec![
            String::new(),
            "ada".to_string(),
            "026a18".to_string(),
            format!("{}4", POLICY),
            format!("{}zz", POLICY),
        ];
        for unit in &bad_units {
            assert!(
                matches!(AssetClass::from_unit(unit), Err(AssetError::InvalidUnit(_))),
                "{} should be rejected",
                unit
            );
        }
        let long_name = format!("{}{}", POLICY, "00".repeat(MAX_ASSET_NAME_LEN + 1));
        assert!(AssetClass::from_unit(&long_name).is_err());
    }

    #[test]
    fn test_canonical_order() {
        let native = AssetClass::native();
        let a = AssetClass::from_unit(&format!("{}41", POLICY)).unwrap();
        let b = AssetClass::from_unit(&format!("{}4142", POLICY)).unwrap();
        let c = AssetClass::from_unit(&format!("ff{}", &POLICY[2..])).unwrap();

        // native has the empty policy id and sorts first
        assert_eq!(compare(&native, &a), Ordering::Less);
        // a name that is a prefix of another sorts first
        assert_eq!(compare(&a, &b), Ordering::Less);
        // policy id dominates the name
        assert_eq!(compare(&b, &c), Ordering::Less);
        assert_eq!(compare(&c, &c.clone()), Ordering::Equal);

        let (first, second) = order_canonical(c.clone(), native.clone());
        assert_eq!(first, native);
        assert_eq!(second, c);
    }

    #[test]
    fn test_serde_as_unit() {
        let asset = AssetClass::from_unit(&format!("{}4c", POLICY)).unwrap();
        let json = serde_json::to_string(&asset).unwrap();
        assert_eq!(json, format!("\"{}4c\"", POLICY));
        let back: AssetClass = serde_json::from_str(&json).unwrap();
        assert_eq!(back, asset);
    }
}
