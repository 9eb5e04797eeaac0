//! Persisted claim record shapes
//!
//! The claim record is created once by the submission finalizer and handed
//! off to persistence; this workflow never mutates it afterward. A separate
//! fulfillment flow may continue its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{ClaimId, DocumentId, PolicyId};
use domain_policy::ClaimType;

use crate::decision::{ClaimStatus, Decision};
use crate::draft::ClaimDraft;
use crate::evidence::EvidenceRole;

/// Persisted claim aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Unique identifier
    pub id: ClaimId,
    /// Generated claim number
    pub claim_number: String,
    /// Policy the claim is filed against
    pub policy_id: PolicyId,
    /// Claim type
    pub claim_type: ClaimType,
    /// Assembled incident description
    pub description: String,
    /// The automatic decision outcome
    pub decision: Decision,
    /// Status derived from the decision
    pub status: ClaimStatus,
    /// Submission timestamp
    pub submitted_at: DateTime<Utc>,
}

impl ClaimRecord {
    /// Creates the record for a decided claim
    pub fn create(
        policy_id: PolicyId,
        claim_type: ClaimType,
        description: String,
        decision: Decision,
    ) -> Self {
        let status = decision.status();
        Self {
            id: ClaimId::new_v7(),
            claim_number: generate_claim_number(),
            policy_id,
            claim_type,
            description,
            decision,
            status,
            submitted_at: Utc::now(),
        }
    }
}

/// Broad persisted document category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Photo,
    Receipt,
    Other,
}

/// One persisted row per uploaded file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDocument {
    /// Unique identifier
    pub id: DocumentId,
    /// Claim this document belongs to
    pub claim_id: ClaimId,
    /// Broad category
    pub document_type: DocumentType,
    /// Specific role, e.g. "defect_photo"
    pub document_subtype: String,
    /// Blob storage path
    pub file_path: String,
    /// File size in bytes
    pub file_size: u64,
    /// AI-analysis metadata, carried by the first photo only
    pub metadata: Option<serde_json::Value>,
}

/// Maps an evidence role to its persisted document type and subtype
pub fn document_classification(role: EvidenceRole) -> (DocumentType, &'static str) {
    match role {
        EvidenceRole::DefectPhoto => (DocumentType::Photo, "defect_photo"),
        EvidenceRole::DamagePhoto => (DocumentType::Photo, "damage_photo"),
        EvidenceRole::ItemPhoto => (DocumentType::Photo, "item_photo"),
        EvidenceRole::TheftScenePhoto => (DocumentType::Photo, "theft_scene_photo"),
        EvidenceRole::ProofOfOwnership => (DocumentType::Receipt, "proof_of_ownership"),
        EvidenceRole::PoliceReport => (DocumentType::Other, "police_report"),
        EvidenceRole::SupportingDocument => (DocumentType::Other, "supporting_document"),
    }
}

/// Assembles the persisted incident description from the draft narrative
pub fn assemble_description(draft: &ClaimDraft) -> String {
    match draft.claim_type {
        ClaimType::Breakdown => {
            let fault = &draft.fault;
            format!(
                "Breakdown: {} - {}. First observed {}.",
                fault.category.as_deref().unwrap_or("unspecified"),
                fault.specific_issue.as_deref().unwrap_or("unspecified"),
                fault
                    .first_observed
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            )
        }
        ClaimType::Damage => {
            let damage = &draft.damage;
            format!(
                "Damage: {} affecting {}. {}",
                damage.damage_type.as_deref().unwrap_or("unspecified"),
                damage.affected_area.as_deref().unwrap_or("unspecified"),
                damage.description.as_deref().unwrap_or(""),
            )
            .trim_end()
            .to_string()
        }
        ClaimType::Theft => {
            let theft = &draft.theft;
            format!(
                "Theft: {} Recovery efforts: {}",
                theft.incident_description.as_deref().unwrap_or("unspecified."),
                theft.recovery_efforts.as_deref().unwrap_or("none reported"),
            )
        }
    }
}

/// Generates a claim number from the current timestamp plus a random suffix
///
/// Not an idempotency key; retried submissions are deduplicated by the
/// session's submission token instead.
pub fn generate_claim_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    let suffix = u16::from_be_bytes({
        let bytes = *Uuid::new_v4().as_bytes();
        [bytes[0], bytes[1]]
    });
    format!("CLM-{}-{:04X}", duration.as_millis() % 10_000_000_000, suffix)
}
