//! Device Identity Verifier
//!
//! Compares the claimed device against the policy's insured device. Runs
//! once, at submission time, over whatever the evidence collector last
//! recorded.

use serde::{Deserialize, Serialize};

use domain_policy::InsuredDevice;

use crate::draft::DeviceClaimInfo;

/// Outcome of device identity verification
///
/// Derived value; never persisted independently of the claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// True when every applicable check passed
    pub matches: bool,
    /// Human-readable outcome, listing each failed field on mismatch
    pub reason: String,
}

impl VerificationResult {
    fn pass() -> Self {
        Self {
            matches: true,
            reason: "claimed device matches the insured device".to_string(),
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            matches: false,
            reason: reason.into(),
        }
    }
}

/// Trimmed, case-insensitive normalization used for every comparison
fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn fields_match(claimed: Option<&str>, insured: &str) -> bool {
    claimed.is_some_and(|c| normalize(c) == normalize(insured))
}

/// Verifies the claimed device identity against the insured device
///
/// Name/category and model require trimmed case-insensitive equality; the
/// serial number is compared only when both sides are non-empty. With no
/// insured device at all, verification fails unconditionally.
pub fn verify(claimed: &DeviceClaimInfo, insured: Option<&InsuredDevice>) -> VerificationResult {
    let Some(insured) = insured else {
        return VerificationResult::fail("no insured device found");
    };

    let mut failed = Vec::new();

    if !fields_match(claimed.category.as_deref(), &insured.product_name) {
        failed.push("device name/category");
    }

    if !fields_match(claimed.model.as_deref(), &insured.model) {
        failed.push("model");
    }

    // A missing serial on either side is not a mismatch.
    let claimed_serial = claimed
        .serial
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let insured_serial = insured
        .serial_number
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let (Some(claimed_serial), Some(insured_serial)) = (claimed_serial, insured_serial) {
        if normalize(claimed_serial) != normalize(insured_serial) {
            failed.push("serial number");
        }
    }

    if failed.is_empty() {
        VerificationResult::pass()
    } else {
        VerificationResult::fail(format!(
            "claimed device does not match the insured device: {}",
            failed.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::DeviceId;
    use proptest::prelude::*;

    fn insured() -> InsuredDevice {
        InsuredDevice {
            id: DeviceId::new(),
            product_name: "iPhone 14".to_string(),
            model: "A2882".to_string(),
            serial_number: Some("F2LXK7".to_string()),
            purchase_price: None,
            purchase_date: None,
            added_date: None,
        }
    }

    fn claimed(category: &str, model: &str, serial: Option<&str>) -> DeviceClaimInfo {
        DeviceClaimInfo {
            category: Some(category.to_string()),
            model: Some(model.to_string()),
            serial: serial.map(String::from),
            ..DeviceClaimInfo::default()
        }
    }

    #[test]
    fn test_exact_match() {
        let result = verify(&claimed("iPhone 14", "A2882", Some("F2LXK7")), Some(&insured()));
        assert!(result.matches);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let result = verify(
            &claimed("iPhone 14 ", " a2882", Some("f2lxk7 ")),
            Some(&insured()),
        );
        assert!(result.matches);
    }

    #[test]
    fn test_missing_serial_on_one_side_is_not_a_mismatch() {
        let result = verify(&claimed("iphone 14", "a2882", None), Some(&insured()));
        assert!(result.matches);

        let mut no_serial = insured();
        no_serial.serial_number = None;
        let result = verify(&claimed("iphone 14", "a2882", Some("XYZ")), Some(&no_serial));
        assert!(result.matches);
    }

    #[test]
    fn test_reason_lists_each_failed_field() {
        let result = verify(
            &claimed("Galaxy S23", "SM-S911", Some("OTHER")),
            Some(&insured()),
        );
        assert!(!result.matches);
        assert!(result.reason.contains("device name/category"));
        assert!(result.reason.contains("model"));
        assert!(result.reason.contains("serial number"));
    }

    #[test]
    fn test_no_insured_device_fails_unconditionally() {
        let result = verify(&claimed("iPhone 14", "A2882", None), None);
        assert!(!result.matches);
        assert_eq!(result.reason, "no insured device found");
    }

    #[test]
    fn test_unset_fields_fail() {
        let result = verify(&DeviceClaimInfo::default(), Some(&insured()));
        assert!(!result.matches);
    }

    proptest! {
        // Normalization is symmetric-insensitive to case and surrounding
        // whitespace for any alphanumeric name.
        #[test]
        fn prop_padding_and_case_never_matter(name in "[a-zA-Z0-9 ]{1,20}", pad in " {0,4}") {
            let mut device = insured();
            device.product_name = name.clone();
            device.model = name.clone();

            let result = verify(
                &claimed(
                    &format!("{pad}{}{pad}", name.to_uppercase()),
                    &format!("{pad}{}{pad}", name.to_lowercase()),
                    None,
                ),
                Some(&device),
            );
            prop_assert!(result.matches);
        }
    }
}
