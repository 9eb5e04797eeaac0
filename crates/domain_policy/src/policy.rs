//! Policy and product value objects

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::PolicyId;

/// Product tier, parsed from the product type string
///
/// The tier only matters when a product carries no explicit peril list;
/// eligibility then falls back to the tier table in [`crate::eligibility`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductTier {
    /// Breakdown-only cover
    Basic,
    /// Accidental-damage-only cover
    Lite,
    /// Full cover: breakdown, damage, and theft
    Max,
    /// Unrecognized product type
    Other,
}

impl ProductTier {
    /// Parses a tier from a free-form product type string
    ///
    /// Matching is case-insensitive and tolerant of decorated names such
    /// as "Device Cover Max" or "BASIC-12M".
    pub fn parse(product_type: &str) -> Self {
        let normalized = product_type.to_lowercase();
        if normalized.contains("basic") {
            ProductTier::Basic
        } else if normalized.contains("lite") {
            ProductTier::Lite
        } else if normalized.contains("max") {
            ProductTier::Max
        } else {
            ProductTier::Other
        }
    }
}

/// The insurance product behind a policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product display name
    pub name: String,
    /// Product tier derived from the product type
    pub tier: ProductTier,
    /// Marketing coverage descriptions
    pub coverage: Vec<String>,
    /// Ordered list of covered perils (e.g. "Screen Damage", "Theft")
    pub perils: Vec<String>,
}

impl Product {
    /// Creates a product from raw source-system fields
    pub fn new(
        name: impl Into<String>,
        product_type: &str,
        coverage: Vec<String>,
        perils: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tier: ProductTier::parse(product_type),
            coverage,
            perils,
        }
    }
}

/// An active policy, loaded once per claim session
///
/// Immutable for the duration of the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Unique identifier
    pub id: PolicyId,
    /// Policy number
    pub policy_number: String,
    /// Cover start date
    pub start_date: NaiveDate,
    /// The product this policy was sold under
    pub product: Product,
}

impl Policy {
    /// Creates a new policy
    pub fn new(
        id: PolicyId,
        policy_number: impl Into<String>,
        start_date: NaiveDate,
        product: Product,
    ) -> Self {
        Self {
            id,
            policy_number: policy_number.into(),
            start_date,
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parsing() {
        assert_eq!(ProductTier::parse("Device Cover Basic"), ProductTier::Basic);
        assert_eq!(ProductTier::parse("LITE"), ProductTier::Lite);
        assert_eq!(ProductTier::parse("cover-max-24"), ProductTier::Max);
        assert_eq!(ProductTier::parse("Extended Warranty"), ProductTier::Other);
    }

    #[test]
    fn test_product_carries_perils_in_order() {
        let product = Product::new(
            "Device Cover Max",
            "max",
            vec![],
            vec!["Theft".to_string(), "Screen Damage".to_string()],
        );
        assert_eq!(product.tier, ProductTier::Max);
        assert_eq!(product.perils[0], "Theft");
    }
}
