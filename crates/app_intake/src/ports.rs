//! Intake Application Ports
//!
//! Port interfaces for the external collaborators of the intake flow: blob
//! storage, the claim repository, claimant notification, and the optional
//! image-analysis service. Per the scope of this workspace the shipped
//! adapters are the in-memory mocks; real implementations live elsewhere.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{DomainPort, PortError};
use domain_claims::draft::Severity;
use domain_claims::evidence::Attachment;
use domain_claims::record::{ClaimDocument, ClaimRecord};
use domain_policy::{PolicyPort, WarrantyPort};

/// Port for the blob store that holds uploaded claim files
#[async_trait]
pub trait FileStoragePort: DomainPort {
    /// Uploads one file and returns its storage path
    ///
    /// `prefix` groups the files of a single submission.
    async fn store(&self, prefix: &str, attachment: &Attachment) -> Result<String, PortError>;
}

/// Port for claim persistence
#[async_trait]
pub trait ClaimRepositoryPort: DomainPort {
    /// Persists the claim record and its documents in one write
    ///
    /// Implementations deduplicate on `idempotency_token`: a repeated call
    /// with the same token returns the previously created record and writes
    /// nothing new.
    async fn insert_claim(
        &self,
        record: ClaimRecord,
        documents: Vec<ClaimDocument>,
        idempotency_token: Uuid,
    ) -> Result<ClaimRecord, PortError>;
}

/// Port for claimant notification
#[async_trait]
pub trait NotificationPort: DomainPort {
    /// Notifies the claimant that the claim was received
    async fn notify_claim_submitted(&self, record: &ClaimRecord) -> Result<(), PortError>;
}

/// Hints extracted from a photo by the image-analysis service
///
/// Advisory only: every field may be wrong, the claimant can override all of
/// them, and nothing here feeds the decision engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Guessed device category or product name
    pub device_category: Option<String>,
    /// Guessed manufacturer
    pub brand: Option<String>,
    /// Guessed model
    pub model: Option<String>,
    /// Guessed color
    pub color: Option<String>,
    /// Damage visible in the photo
    pub damage_observations: Vec<String>,
    /// Warning when the photo does not appear to show the insured device
    pub mismatch_warning: Option<String>,
    /// Suggested fault severity
    pub suggested_severity: Option<Severity>,
    /// Free-text explanation from the analysis service
    pub explanation: Option<String>,
}

impl AnalysisReport {
    /// The report as a JSON blob, for persistence on the first photo document
    pub fn to_metadata(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Port for the image-analysis service
#[async_trait]
pub trait ImageAnalysisPort: DomainPort {
    /// Analyzes a claim photo and returns extraction hints
    async fn analyze(&self, photo: &Attachment) -> Result<AnalysisReport, PortError>;
}

/// The full set of ports an intake session needs
#[derive(Clone)]
pub struct IntakePorts {
    pub policy: Arc<dyn PolicyPort>,
    pub warranty: Arc<dyn WarrantyPort>,
    pub storage: Arc<dyn FileStoragePort>,
    pub repository: Arc<dyn ClaimRepositoryPort>,
    pub notification: Arc<dyn NotificationPort>,
    pub analysis: Arc<dyn ImageAnalysisPort>,
}

/// In-memory adapters
///
/// These are the only adapters this workspace ships; the demo binary and
/// the integration tests both run against them.
pub mod mock {
    use super::*;
    use core_kernel::ClaimId;
    use std::collections::{HashMap, HashSet};
    use tokio::sync::RwLock;

    /// In-memory mock implementation of FileStoragePort
    #[derive(Debug, Default)]
    pub struct MockFileStorage {
        files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
        reject_names: Arc<RwLock<HashSet<String>>>,
    }

    impl MockFileStorage {
        /// Creates a new mock store
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes uploads of the named file fail, for partial-upload tests
        pub async fn reject_file(&self, file_name: impl Into<String>) {
            self.reject_names.write().await.insert(file_name.into());
        }

        /// Number of files held in the store
        pub async fn stored_count(&self) -> usize {
            self.files.read().await.len()
        }
    }

    impl DomainPort for MockFileStorage {}

    #[async_trait]
    impl FileStoragePort for MockFileStorage {
        async fn store(&self, prefix: &str, attachment: &Attachment) -> Result<String, PortError> {
            if self.reject_names.read().await.contains(&attachment.file_name) {
                return Err(PortError::connection(format!(
                    "upload of {} refused",
                    attachment.file_name
                )));
            }
            let path = format!("claims/{}/{}-{}", prefix, attachment.id, attachment.file_name);
            self.files
                .write()
                .await
                .insert(path.clone(), attachment.bytes.clone());
            Ok(path)
        }
    }

    /// In-memory mock implementation of ClaimRepositoryPort
    #[derive(Debug, Default)]
    pub struct MockClaimRepository {
        claims: Arc<RwLock<HashMap<Uuid, ClaimRecord>>>,
        documents: Arc<RwLock<Vec<ClaimDocument>>>,
        fail_inserts: Arc<RwLock<bool>>,
    }

    impl MockClaimRepository {
        /// Creates a new mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes subsequent inserts fail
        pub async fn set_fail_inserts(&self, fail: bool) {
            *self.fail_inserts.write().await = fail;
        }

        /// Number of persisted claims
        pub async fn claim_count(&self) -> usize {
            self.claims.read().await.len()
        }

        /// Documents persisted for a claim
        pub async fn documents_for(&self, claim_id: ClaimId) -> Vec<ClaimDocument> {
            self.documents
                .read()
                .await
                .iter()
                .filter(|d| d.claim_id == claim_id)
                .cloned()
                .collect()
        }
    }

    impl DomainPort for MockClaimRepository {}

    #[async_trait]
    impl ClaimRepositoryPort for MockClaimRepository {
        async fn insert_claim(
            &self,
            record: ClaimRecord,
            documents: Vec<ClaimDocument>,
            idempotency_token: Uuid,
        ) -> Result<ClaimRecord, PortError> {
            if *self.fail_inserts.read().await {
                return Err(PortError::ServiceUnavailable {
                    service: "claims-db".to_string(),
                });
            }
            let mut claims = self.claims.write().await;
            if let Some(existing) = claims.get(&idempotency_token) {
                return Ok(existing.clone());
            }
            claims.insert(idempotency_token, record.clone());
            self.documents.write().await.extend(documents);
            Ok(record)
        }
    }

    /// In-memory mock implementation of NotificationPort
    #[derive(Debug, Default)]
    pub struct MockNotification {
        sent: Arc<RwLock<Vec<String>>>,
        fail_sends: Arc<RwLock<bool>>,
    }

    impl MockNotification {
        /// Creates a new mock notifier
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes subsequent sends fail
        pub async fn set_fail_sends(&self, fail: bool) {
            *self.fail_sends.write().await = fail;
        }

        /// Claim numbers a notification was sent for
        pub async fn sent_claim_numbers(&self) -> Vec<String> {
            self.sent.read().await.clone()
        }
    }

    impl DomainPort for MockNotification {}

    #[async_trait]
    impl NotificationPort for MockNotification {
        async fn notify_claim_submitted(&self, record: &ClaimRecord) -> Result<(), PortError> {
            if *self.fail_sends.read().await {
                return Err(PortError::ServiceUnavailable {
                    service: "notifications".to_string(),
                });
            }
            self.sent.write().await.push(record.claim_number.clone());
            Ok(())
        }
    }

    /// In-memory mock implementation of ImageAnalysisPort
    #[derive(Debug, Default)]
    pub struct MockImageAnalysis {
        report: Arc<RwLock<Option<AnalysisReport>>>,
        fail_analysis: Arc<RwLock<bool>>,
    }

    impl MockImageAnalysis {
        /// Creates a new mock analyzer returning empty reports
        pub fn new() -> Self {
            Self::default()
        }

        /// Sets the report returned for every photo
        pub async fn set_report(&self, report: AnalysisReport) {
            *self.report.write().await = Some(report);
        }

        /// Makes subsequent analysis calls fail
        pub async fn set_fail_analysis(&self, fail: bool) {
            *self.fail_analysis.write().await = fail;
        }
    }

    impl DomainPort for MockImageAnalysis {}

    #[async_trait]
    impl ImageAnalysisPort for MockImageAnalysis {
        async fn analyze(&self, _photo: &Attachment) -> Result<AnalysisReport, PortError> {
            if *self.fail_analysis.read().await {
                return Err(PortError::Timeout {
                    operation: "analyze".to_string(),
                    duration_ms: 5000,
                });
            }
            Ok(self.report.read().await.clone().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use domain_claims::evidence::EvidenceRole;

    #[tokio::test]
    async fn test_mock_storage_paths_are_unique_per_attachment() {
        let storage = MockFileStorage::new();
        let a = Attachment::new(EvidenceRole::DamagePhoto, "a.jpg", "image/jpeg", vec![1]).unwrap();
        let b = Attachment::new(EvidenceRole::DamagePhoto, "a.jpg", "image/jpeg", vec![2]).unwrap();

        let path_a = storage.store("tok", &a).await.unwrap();
        let path_b = storage.store("tok", &b).await.unwrap();
        assert_ne!(path_a, path_b);
        assert_eq!(storage.stored_count().await, 2);
    }

    #[tokio::test]
    async fn test_mock_repository_dedupes_on_token() {
        use domain_claims::decision::{Decision, DecisionOutcome};
        use domain_claims::ClaimType;

        let repository = MockClaimRepository::new();
        let token = Uuid::new_v4();
        let record = ClaimRecord::create(
            core_kernel::PolicyId::new(),
            ClaimType::Theft,
            "Theft: stolen.".to_string(),
            Decision {
                outcome: DecisionOutcome::Referred,
                reason: "manual review".to_string(),
            },
        );

        let first = repository
            .insert_claim(record.clone(), vec![], token)
            .await
            .unwrap();
        let retry = ClaimRecord::create(
            record.policy_id,
            ClaimType::Theft,
            record.description.clone(),
            record.decision.clone(),
        );
        let second = repository.insert_claim(retry, vec![], token).await.unwrap();

        assert_eq!(first.claim_number, second.claim_number);
        assert_eq!(repository.claim_count().await, 1);
    }

    #[test]
    fn test_analysis_report_metadata_roundtrip() {
        let report = AnalysisReport {
            model: Some("A2882".to_string()),
            damage_observations: vec!["cracked screen".to_string()],
            ..AnalysisReport::default()
        };
        let metadata = report.to_metadata();
        assert_eq!(metadata["model"], "A2882");
        assert_eq!(metadata["damage_observations"][0], "cracked screen");
    }
}
