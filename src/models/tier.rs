//! Reward tier codes and their fixed charge amounts.
//!
//! The tier code is the only thing that determines how much a card is
//! charged. It is a closed enumeration: anything outside BRONZE, SILVER,
//! or GOLD is rejected during validation instead of being priced at zero.

use serde::{Deserialize, Serialize};

/// Reward tier selected by the payer.
///
/// Serializes as the upper-case wire code ("BRONZE", "SILVER", "GOLD"),
/// which is also the form persisted in the `payments.tier` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
}

/// Error returned when a tier code is not one of the three known values.
#[derive(Debug, thiserror::Error)]
#[error("unknown tier code: {0:?}")]
pub struct UnknownTier(pub String);

impl Tier {
    /// Charge amount for this tier, in minor currency units (cents).
    pub fn amount_cents(self) -> i64 {
        match self {
            Tier::Bronze => 2500,
            Tier::Silver => 5000,
            Tier::Gold => 10000,
        }
    }

    /// Upper-case wire code for this tier.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = UnknownTier;

    /// Exact match against the three wire codes. Case matters: "bronze" is
    /// rejected, the same as any other unknown string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BRONZE" => Ok(Tier::Bronze),
            "SILVER" => Ok(Tier::Silver),
            "GOLD" => Ok(Tier::Gold),
            other => Err(UnknownTier(other.to_string())),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_known_tiers_map_to_fixed_amounts() {
        assert_eq!(Tier::from_str("BRONZE").unwrap().amount_cents(), 2500);
        assert_eq!(Tier::from_str("SILVER").unwrap().amount_cents(), 5000);
        assert_eq!(Tier::from_str("GOLD").unwrap().amount_cents(), 10000);
    }

    #[test]
    fn test_unknown_tier_is_rejected_not_zero_priced() {
        assert!(Tier::from_str("PLATINUM").is_err());
        assert!(Tier::from_str("").is_err());
        assert!(Tier::from_str("bronze").is_err());
        assert!(Tier::from_str(" GOLD").is_err());
    }

    #[test]
    fn test_wire_code_round_trip() {
        for tier in [Tier::Bronze, Tier::Silver, Tier::Gold] {
            assert_eq!(Tier::from_str(tier.as_str()).unwrap(), tier);
        }
    }

    #[test]
    fn test_serde_uses_upper_case_codes() {
        let json = serde_json::to_string(&Tier::Silver).unwrap();
        assert_eq!(json, "\"SILVER\"");

        let parsed: Tier = serde_json::from_str("\"GOLD\"").unwrap();
        assert_eq!(parsed, Tier::Gold);
    }
}
