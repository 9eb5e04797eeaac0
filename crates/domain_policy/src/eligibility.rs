//! Peril-Coverage Gate
//!
//! Decides which claim types are legal for a policy. When the product
//! carries an explicit peril list, eligibility is a case-insensitive
//! substring match against a fixed vocabulary per claim type. When the
//! peril list is empty, eligibility falls back to the product tier.
//!
//! The gate runs twice: once to filter the selectable claim types in the
//! intake wizard, and again at submission time. UI disablement is not a
//! substitute for re-validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::policy::{Policy, ProductTier};

/// The top-level category of an incident a user reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    /// Mechanical or electrical fault
    Breakdown,
    /// Accidental damage
    Damage,
    /// Theft or loss
    Theft,
}

impl ClaimType {
    /// All claim types, in presentation order
    pub const ALL: [ClaimType; 3] = [ClaimType::Breakdown, ClaimType::Damage, ClaimType::Theft];
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimType::Breakdown => "breakdown",
            ClaimType::Damage => "damage",
            ClaimType::Theft => "theft",
        };
        write!(f, "{name}")
    }
}

/// Peril vocabulary per claim type
///
/// A peril counts toward a claim type when its lowercased name contains
/// any of these fragments.
fn peril_vocabulary(claim_type: ClaimType) -> &'static [&'static str] {
    match claim_type {
        ClaimType::Breakdown => &[
            "breakdown",
            "malfunction",
            "mechanical",
            "electrical",
            "warranty",
        ],
        ClaimType::Damage => &[
            "accidental damage",
            "screen damage",
            "water",
            "liquid",
            "damage",
        ],
        ClaimType::Theft => &["theft", "loss", "stolen"],
    }
}

/// Tier fallback used when the peril list is empty
fn tier_allows(tier: ProductTier, claim_type: ClaimType) -> bool {
    match tier {
        ProductTier::Basic => claim_type == ClaimType::Breakdown,
        ProductTier::Lite => claim_type == ClaimType::Damage,
        // Unrecognized tiers get full cover rather than locking the
        // customer out of filing entirely.
        ProductTier::Max | ProductTier::Other => true,
    }
}

/// Returns true when the policy permits filing a claim of the given type
pub fn is_claim_type_allowed(policy: &Policy, claim_type: ClaimType) -> bool {
    let perils = &policy.product.perils;
    if perils.is_empty() {
        return tier_allows(policy.product.tier, claim_type);
    }

    let vocabulary = peril_vocabulary(claim_type);
    perils.iter().any(|peril| {
        let peril = peril.to_lowercase();
        vocabulary.iter().any(|fragment| peril.contains(fragment))
    })
}

/// Returns every claim type the policy permits, in presentation order
pub fn allowed_claim_types(policy: &Policy) -> Vec<ClaimType> {
    ClaimType::ALL
        .into_iter()
        .filter(|ct| is_claim_type_allowed(policy, *ct))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Product;
    use chrono::NaiveDate;
    use core_kernel::PolicyId;

    fn policy_with(perils: Vec<&str>, product_type: &str) -> Policy {
        Policy::new(
            PolicyId::new(),
            "P-100200",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Product::new(
                "Device Cover",
                product_type,
                vec![],
                perils.into_iter().map(String::from).collect(),
            ),
        )
    }

    #[test]
    fn test_peril_match_is_case_insensitive_substring() {
        let policy = policy_with(vec!["Mechanical Breakdown"], "basic");
        assert!(is_claim_type_allowed(&policy, ClaimType::Breakdown));
        assert!(!is_claim_type_allowed(&policy, ClaimType::Theft));
    }

    #[test]
    fn test_theft_peril_allows_theft_regardless_of_tier() {
        for tier in ["basic", "lite", "max"] {
            let policy = policy_with(vec!["Theft"], tier);
            assert!(is_claim_type_allowed(&policy, ClaimType::Theft));
        }
    }

    #[test]
    fn test_loss_counts_as_theft() {
        let policy = policy_with(vec!["Accidental Loss"], "basic");
        assert!(is_claim_type_allowed(&policy, ClaimType::Theft));
    }

    #[test]
    fn test_water_counts_as_damage() {
        let policy = policy_with(vec!["Water Ingress"], "basic");
        assert!(is_claim_type_allowed(&policy, ClaimType::Damage));
    }

    #[test]
    fn test_empty_perils_fall_back_to_tier() {
        let basic = policy_with(vec![], "Device Cover Basic");
        assert!(is_claim_type_allowed(&basic, ClaimType::Breakdown));
        assert!(!is_claim_type_allowed(&basic, ClaimType::Damage));
        assert!(!is_claim_type_allowed(&basic, ClaimType::Theft));

        let lite = policy_with(vec![], "Device Cover Lite");
        assert_eq!(allowed_claim_types(&lite), vec![ClaimType::Damage]);

        let max = policy_with(vec![], "Device Cover Max");
        assert_eq!(allowed_claim_types(&max).len(), 3);
    }

    #[test]
    fn test_unrecognized_tier_with_empty_perils_allows_all() {
        let policy = policy_with(vec![], "Extended Warranty");
        assert_eq!(allowed_claim_types(&policy).len(), 3);
    }

    #[test]
    fn test_peril_list_overrides_tier() {
        // Perils present: the tier table is not consulted.
        let policy = policy_with(vec!["Theft"], "Device Cover Basic");
        assert!(is_claim_type_allowed(&policy, ClaimType::Theft));
        assert!(!is_claim_type_allowed(&policy, ClaimType::Breakdown));
    }
}
