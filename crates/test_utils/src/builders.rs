//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. These builders allow tests to specify only the relevant fields
//! while using defaults for everything else.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use core_kernel::{DeviceId, PolicyId};
use domain_policy::{InsuredDevice, Policy, Product};

use crate::fixtures::{DateFixtures, StringFixtures, FULL_COVER_PERILS};

/// Builder for test policies
pub struct PolicyBuilder {
    id: PolicyId,
    policy_number: String,
    start_date: NaiveDate,
    product_name: String,
    product_type: String,
    coverage: Vec<String>,
    perils: Vec<String>,
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyBuilder {
    /// Creates a builder for a full-cover policy with the standard perils
    pub fn new() -> Self {
        Self {
            id: PolicyId::new(),
            policy_number: StringFixtures::policy_number().to_string(),
            start_date: DateFixtures::policy_start(),
            product_name: "Device Cover Max".to_string(),
            product_type: "max".to_string(),
            coverage: vec![],
            perils: FULL_COVER_PERILS.clone(),
        }
    }

    /// Sets the policy ID
    pub fn with_id(mut self, id: PolicyId) -> Self {
        self.id = id;
        self
    }

    /// Sets the policy number
    pub fn with_policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy_number = number.into();
        self
    }

    /// Sets the cover start date
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = date;
        self
    }

    /// Sets the product name and type string
    pub fn with_product(mut self, name: impl Into<String>, product_type: impl Into<String>) -> Self {
        self.product_name = name.into();
        self.product_type = product_type.into();
        self
    }

    /// Sets the covered perils
    pub fn with_perils(mut self, perils: Vec<String>) -> Self {
        self.perils = perils;
        self
    }

    /// Clears the peril list, forcing the tier fallback
    pub fn with_no_perils(mut self) -> Self {
        self.perils = vec![];
        self
    }

    /// Builds the policy
    pub fn build(self) -> Policy {
        Policy::new(
            self.id,
            self.policy_number,
            self.start_date,
            Product::new(
                self.product_name,
                &self.product_type,
                self.coverage,
                self.perils,
            ),
        )
    }
}

/// Builder for insured device records
pub struct InsuredDeviceBuilder {
    product_name: String,
    model: String,
    serial_number: Option<String>,
    purchase_price: Option<Decimal>,
    purchase_date: Option<NaiveDate>,
    added_date: Option<NaiveDate>,
}

impl Default for InsuredDeviceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InsuredDeviceBuilder {
    /// Creates a builder for the standard insured smartphone
    pub fn new() -> Self {
        Self {
            product_name: StringFixtures::product_name().to_string(),
            model: StringFixtures::device_model().to_string(),
            serial_number: Some(StringFixtures::serial_number().to_string()),
            purchase_price: None,
            purchase_date: Some(DateFixtures::purchase_date()),
            added_date: None,
        }
    }

    /// Sets the registered product name
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    /// Sets the model designation
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets or clears the serial number
    pub fn with_serial(mut self, serial: Option<String>) -> Self {
        self.serial_number = serial;
        self
    }

    /// Sets the purchase price
    pub fn with_purchase_price(mut self, price: Decimal) -> Self {
        self.purchase_price = Some(price);
        self
    }

    /// Sets or clears the purchase date
    pub fn with_purchase_date(mut self, date: Option<NaiveDate>) -> Self {
        self.purchase_date = date;
        self
    }

    /// Sets the date the device was added to the policy
    pub fn with_added_date(mut self, date: Option<NaiveDate>) -> Self {
        self.added_date = date;
        self
    }

    /// Builds the device record
    pub fn build(self) -> InsuredDevice {
        InsuredDevice {
            id: DeviceId::new(),
            product_name: self.product_name,
            model: self.model,
            serial_number: self.serial_number,
            purchase_price: self.purchase_price,
            purchase_date: self.purchase_date,
            added_date: self.added_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_policy::ProductTier;

    #[test]
    fn test_policy_builder_defaults() {
        let policy = PolicyBuilder::new().build();
        assert_eq!(policy.product.tier, ProductTier::Max);
        assert!(policy.product.perils.iter().any(|p| p == "Theft"));
    }

    #[test]
    fn test_device_builder_overrides() {
        let device = InsuredDeviceBuilder::new()
            .with_model("SM-S918")
            .with_serial(None)
            .build();
        assert_eq!(device.model, "SM-S918");
        assert!(!device.has_serial());
    }
}
