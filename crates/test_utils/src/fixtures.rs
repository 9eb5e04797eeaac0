//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for common entities across the intake
//! flow. These fixtures are designed to be consistent and predictable for
//! unit tests; randomized values come from `fake` and are only used where
//! the exact value does not matter.

use chrono::NaiveDate;
use fake::faker::name::en::Name;
use fake::Fake;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixture for date test data
pub struct DateFixtures;

impl DateFixtures {
    /// Standard policy start date (Jan 1, 2024)
    pub fn policy_start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Standard device purchase date (Feb 1, 2023)
    pub fn purchase_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()
    }

    /// A fault date inside the standard 12-month warranty window
    pub fn fault_within_warranty() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
    }

    /// A fault date outside the standard 12-month warranty window
    pub fn fault_outside_warranty() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    /// Standard policy number
    pub fn policy_number() -> &'static str {
        "P-2024-778899"
    }

    /// Standard insured product name
    pub fn product_name() -> &'static str {
        "iPhone 14"
    }

    /// Standard device model designation
    pub fn device_model() -> &'static str {
        "A2882"
    }

    /// Standard device serial number
    pub fn serial_number() -> &'static str {
        "F2LXK7PQ0D"
    }

    /// A random but plausible claimant signature name
    pub fn signature_name() -> String {
        Name().fake()
    }

    /// A theft narrative long enough for the incident-description minimum
    pub fn theft_description() -> &'static str {
        "My phone was stolen from my bag on the evening train home"
    }

    /// A recovery-efforts narrative long enough for the minimum
    pub fn recovery_efforts() -> &'static str {
        "I retraced the route, contacted the rail operator's lost property \
         office, and tracked the device with the find-my-device service"
    }
}

/// Fixture for price test data
pub struct PriceFixtures;

impl PriceFixtures {
    /// Standard smartphone purchase price
    pub fn smartphone_price() -> Decimal {
        dec!(899.00)
    }
}

/// Standard peril vocabulary as it appears on real product records
pub static FULL_COVER_PERILS: Lazy<Vec<String>> = Lazy::new(|| {
    vec![
        "Mechanical Breakdown".to_string(),
        "Accidental Damage".to_string(),
        "Screen Damage".to_string(),
        "Theft".to_string(),
    ]
});
