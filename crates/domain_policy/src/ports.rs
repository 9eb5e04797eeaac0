//! Policy Domain Ports
//!
//! Port interfaces for the external collaborators the policy context
//! depends on: the policy/device source of record and the manufacturer
//! warranty lookup. Adapters can be remote-service implementations or the
//! in-memory mocks provided here for testing.

use async_trait::async_trait;

use core_kernel::{DomainPort, OperationMetadata, PolicyId, PortError};

use crate::device::InsuredDevice;
use crate::policy::Policy;

/// Months of manufacturer warranty assumed when no lookup entry exists
pub const DEFAULT_WARRANTY_MONTHS: u32 = 12;

/// Port for the policy/device source of record
///
/// Pure data fetch; no business logic. Loaded once per claim session.
#[async_trait]
pub trait PolicyPort: DomainPort {
    /// Retrieves the active policy
    async fn get_policy(
        &self,
        id: PolicyId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Policy, PortError>;

    /// Retrieves the insured device registered against the policy
    ///
    /// Returns `Ok(None)` when the policy has no device record; this flow
    /// supports at most one device per policy.
    async fn get_insured_device(
        &self,
        policy_id: PolicyId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Option<InsuredDevice>, PortError>;

    /// Propagates corrected device attributes back to the insured-device
    /// record (best-effort; callers must not fail the flow on error)
    async fn update_insured_device(
        &self,
        policy_id: PolicyId,
        device: InsuredDevice,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;
}

/// Port for the manufacturer-warranty duration lookup
#[async_trait]
pub trait WarrantyPort: DomainPort {
    /// Warranty months for a specific device model, if known
    async fn warranty_months_by_model(&self, model: &str) -> Result<Option<u32>, PortError>;

    /// Warranty months for a device category, if known
    async fn warranty_months_by_category(&self, category: &str) -> Result<Option<u32>, PortError>;
}

/// Resolves the warranty duration for a device
///
/// Priority: model-specific lookup, then category lookup, then
/// [`DEFAULT_WARRANTY_MONTHS`].
pub async fn resolve_warranty_months(
    port: &dyn WarrantyPort,
    model: &str,
    category: &str,
) -> Result<u32, PortError> {
    if let Some(months) = port.warranty_months_by_model(model).await? {
        return Ok(months);
    }
    if let Some(months) = port.warranty_months_by_category(category).await? {
        return Ok(months);
    }
    tracing::debug!(model, category, "no warranty entry found, using default");
    Ok(DEFAULT_WARRANTY_MONTHS)
}

/// Mock implementations for testing
///
/// These adapters store data in memory and are useful for unit testing
/// without remote-service dependencies.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory mock implementation of PolicyPort
    #[derive(Debug, Default)]
    pub struct MockPolicyPort {
        policies: Arc<RwLock<HashMap<PolicyId, Policy>>>,
        devices: Arc<RwLock<HashMap<PolicyId, InsuredDevice>>>,
        fail_device_updates: Arc<RwLock<bool>>,
    }

    impl MockPolicyPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a policy
        pub async fn insert_policy(&self, policy: Policy) {
            self.policies.write().await.insert(policy.id, policy);
        }

        /// Registers an insured device against a policy
        pub async fn insert_device(&self, policy_id: PolicyId, device: InsuredDevice) {
            self.devices.write().await.insert(policy_id, device);
        }

        /// Makes subsequent device updates fail, for best-effort-path tests
        pub async fn set_fail_device_updates(&self, fail: bool) {
            *self.fail_device_updates.write().await = fail;
        }

        /// Returns the stored device for assertions
        pub async fn device_for(&self, policy_id: PolicyId) -> Option<InsuredDevice> {
            self.devices.read().await.get(&policy_id).cloned()
        }
    }

    impl DomainPort for MockPolicyPort {}

    #[async_trait]
    impl PolicyPort for MockPolicyPort {
        async fn get_policy(
            &self,
            id: PolicyId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Policy, PortError> {
            self.policies
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("Policy", id))
        }

        async fn get_insured_device(
            &self,
            policy_id: PolicyId,
            _metadata: Option<OperationMetadata>,
        ) -> Result<Option<InsuredDevice>, PortError> {
            Ok(self.devices.read().await.get(&policy_id).cloned())
        }

        async fn update_insured_device(
            &self,
            policy_id: PolicyId,
            device: InsuredDevice,
            _metadata: Option<OperationMetadata>,
        ) -> Result<(), PortError> {
            if *self.fail_device_updates.read().await {
                return Err(PortError::ServiceUnavailable {
                    service: "policy-admin".to_string(),
                });
            }
            self.devices.write().await.insert(policy_id, device);
            Ok(())
        }
    }

    /// In-memory mock implementation of WarrantyPort
    #[derive(Debug, Default)]
    pub struct MockWarrantyPort {
        by_model: Arc<RwLock<HashMap<String, u32>>>,
        by_category: Arc<RwLock<HashMap<String, u32>>>,
    }

    impl MockWarrantyPort {
        /// Creates a new mock port with empty lookup tables
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a model-specific warranty duration
        pub async fn insert_model(&self, model: impl Into<String>, months: u32) {
            self.by_model.write().await.insert(model.into(), months);
        }

        /// Registers a category warranty duration
        pub async fn insert_category(&self, category: impl Into<String>, months: u32) {
            self.by_category
                .write()
                .await
                .insert(category.into(), months);
        }
    }

    impl DomainPort for MockWarrantyPort {}

    #[async_trait]
    impl WarrantyPort for MockWarrantyPort {
        async fn warranty_months_by_model(&self, model: &str) -> Result<Option<u32>, PortError> {
            Ok(self.by_model.read().await.get(model).copied())
        }

        async fn warranty_months_by_category(
            &self,
            category: &str,
        ) -> Result<Option<u32>, PortError> {
            Ok(self.by_category.read().await.get(category).copied())
        }
    }
}
