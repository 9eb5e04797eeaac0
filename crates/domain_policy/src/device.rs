//! Insured device record
//!
//! At most one insured device exists per policy in this flow. The record is
//! the read-only source of truth for device identity verification.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::DeviceId;

/// The single physical item registered against a policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuredDevice {
    /// Unique identifier
    pub id: DeviceId,
    /// Product name as registered (e.g. "iPhone 14")
    pub product_name: String,
    /// Model designation
    pub model: String,
    /// Serial number, if captured at enrollment
    pub serial_number: Option<String>,
    /// Purchase price, if captured
    pub purchase_price: Option<Decimal>,
    /// Date the device was purchased
    pub purchase_date: Option<NaiveDate>,
    /// Date the device was added to the policy
    pub added_date: Option<NaiveDate>,
}

impl InsuredDevice {
    /// Resolves the effective purchase date for warranty evaluation
    ///
    /// Priority: purchase date, then enrollment date, then the supplied
    /// policy start date. Returns `None` only when all three are absent.
    pub fn effective_purchase_date(&self, policy_start: Option<NaiveDate>) -> Option<NaiveDate> {
        self.purchase_date.or(self.added_date).or(policy_start)
    }

    /// Returns true when the device record carries a non-empty serial
    pub fn has_serial(&self) -> bool {
        self.serial_number
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn device() -> InsuredDevice {
        InsuredDevice {
            id: DeviceId::new(),
            product_name: "iPhone 14".to_string(),
            model: "A2882".to_string(),
            serial_number: None,
            purchase_price: None,
            purchase_date: None,
            added_date: None,
        }
    }

    #[test]
    fn test_effective_purchase_date_priority() {
        let mut d = device();
        d.purchase_date = Some(date(2024, 1, 10));
        d.added_date = Some(date(2024, 2, 1));
        assert_eq!(
            d.effective_purchase_date(Some(date(2024, 3, 1))),
            Some(date(2024, 1, 10))
        );

        d.purchase_date = None;
        assert_eq!(
            d.effective_purchase_date(Some(date(2024, 3, 1))),
            Some(date(2024, 2, 1))
        );

        d.added_date = None;
        assert_eq!(
            d.effective_purchase_date(Some(date(2024, 3, 1))),
            Some(date(2024, 3, 1))
        );
        assert_eq!(d.effective_purchase_date(None), None);
    }

    #[test]
    fn test_has_serial_ignores_whitespace() {
        let mut d = device();
        assert!(!d.has_serial());
        d.serial_number = Some("   ".to_string());
        assert!(!d.has_serial());
        d.serial_number = Some("F2LXK7".to_string());
        assert!(d.has_serial());
    }
}
