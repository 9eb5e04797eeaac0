//! Decision Engine
//!
//! Applies a priority-ordered rule set over the verification result, the
//! warranty result, and the evidence facts to produce an automatic decision
//! with a human-readable rationale. Evidence completeness is re-derived
//! from the draft here rather than trusted from the navigator, so a
//! navigator bug cannot leak an incomplete claim through to acceptance.
//!
//! Computed once, at submission time; terminal and never recomputed.

use serde::{Deserialize, Serialize};
use std::fmt;

use domain_policy::ClaimType;

use crate::draft::ClaimDraft;
use crate::evidence::EvidenceRole;
use crate::verification::VerificationResult;
use crate::warranty::WarrantyResult;

/// Automatic adjudication outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Claim accepted for fulfillment
    Accepted,
    /// Claim rejected
    Rejected,
    /// Manual human review required
    Referred,
}

/// Persisted claim status, mapped 1:1 from the decision outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Accepted and the claimant notified
    Notified,
    /// Awaiting manual review
    Referred,
    /// Rejected
    Rejected,
}

impl From<DecisionOutcome> for ClaimStatus {
    fn from(outcome: DecisionOutcome) -> Self {
        match outcome {
            DecisionOutcome::Accepted => ClaimStatus::Notified,
            DecisionOutcome::Referred => ClaimStatus::Referred,
            DecisionOutcome::Rejected => ClaimStatus::Rejected,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimStatus::Notified => "notified",
            ClaimStatus::Referred => "referred",
            ClaimStatus::Rejected => "rejected",
        };
        write!(f, "{name}")
    }
}

/// The automatic decision with its rationale
///
/// The reason string is persisted verbatim on the claim record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub outcome: DecisionOutcome,
    pub reason: String,
}

impl Decision {
    fn referred(reason: impl Into<String>) -> Self {
        Self {
            outcome: DecisionOutcome::Referred,
            reason: reason.into(),
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            outcome: DecisionOutcome::Rejected,
            reason: reason.into(),
        }
    }

    fn accepted(reason: impl Into<String>) -> Self {
        Self {
            outcome: DecisionOutcome::Accepted,
            reason: reason.into(),
        }
    }

    /// The persisted status for this decision
    pub fn status(&self) -> ClaimStatus {
        ClaimStatus::from(self.outcome)
    }
}

/// Computes the automatic decision
///
/// First matching rule wins:
/// 1. Verification mismatch: referred.
/// 2. (breakdown) Within manufacturer warranty: rejected.
/// 3. (breakdown) Defect photo missing: referred.
/// 4. (damage) Damage photo or proof of ownership missing: referred.
/// 5. (theft) Police not notified: referred.
/// 6. (theft) Police report, item photo, scene photo, or ownership proof
///    missing: referred, naming each gap.
/// 7. Otherwise accepted, summarizing the claim facts.
pub fn decide(
    draft: &ClaimDraft,
    verification: &VerificationResult,
    warranty: Option<&WarrantyResult>,
) -> Decision {
    if !verification.matches {
        return Decision::referred(format!(
            "device verification failed: {}",
            verification.reason
        ));
    }

    match draft.claim_type {
        ClaimType::Breakdown => decide_breakdown(draft, warranty),
        ClaimType::Damage => decide_damage(draft),
        ClaimType::Theft => decide_theft(draft),
    }
}

fn decide_breakdown(draft: &ClaimDraft, warranty: Option<&WarrantyResult>) -> Decision {
    if let Some(warranty) = warranty.filter(|w| w.within_warranty) {
        let window = match (warranty.purchase_date, warranty.warranty_end) {
            (Some(start), Some(end)) => format!(" ({start} to {end})"),
            _ => String::new(),
        };
        return Decision::rejected(format!(
            "manufacturer warranty still active: the reported fault falls inside \
             the {}-month warranty window{window}; claim this repair with the manufacturer",
            warranty.warranty_months
        ));
    }

    // Unreachable when the navigator gated the defect-photo stage, kept as
    // an independent check.
    if !draft.has_attachment(EvidenceRole::DefectPhoto) {
        return Decision::referred("mandatory defect photo is missing");
    }

    let fault = &draft.fault;
    let severity = fault
        .severity
        .map(|s| format!("{s:?}").to_lowercase())
        .unwrap_or_else(|| "unspecified".to_string());
    Decision::accepted(format!(
        "breakdown claim accepted: fault category '{}', issue '{}', severity {}; \
         device identity verified against the insured device",
        fault.category.as_deref().unwrap_or("unspecified"),
        fault.specific_issue.as_deref().unwrap_or("unspecified"),
        severity,
    ))
}

fn decide_damage(draft: &ClaimDraft) -> Decision {
    let mut missing = Vec::new();
    if !draft.has_attachment(EvidenceRole::DamagePhoto) {
        missing.push("damage photo");
    }
    if !draft.has_attachment(EvidenceRole::ProofOfOwnership) {
        missing.push("proof of ownership");
    }
    if !missing.is_empty() {
        return Decision::referred(format!(
            "required documentation missing: {}",
            missing.join(", ")
        ));
    }

    let damage = &draft.damage;
    Decision::accepted(format!(
        "damage claim accepted: '{}' affecting '{}'; device identity verified \
         against the insured device",
        damage.damage_type.as_deref().unwrap_or("unspecified"),
        damage.affected_area.as_deref().unwrap_or("unspecified"),
    ))
}

fn decide_theft(draft: &ClaimDraft) -> Decision {
    if draft.theft.police_notified != Some(true) {
        return Decision::referred("theft claims require police notification");
    }

    let mut missing = Vec::new();
    if !draft.has_attachment(EvidenceRole::PoliceReport) {
        missing.push("police report");
    }
    if !draft.has_attachment(EvidenceRole::ItemPhoto) {
        missing.push("item photo");
    }
    if !draft.has_attachment(EvidenceRole::TheftScenePhoto) {
        missing.push("theft scene photo");
    }
    if !draft.has_attachment(EvidenceRole::ProofOfOwnership) {
        missing.push("proof of ownership");
    }
    if !missing.is_empty() {
        return Decision::referred(format!(
            "required documentation missing: {}",
            missing.join(", ")
        ));
    }

    Decision::accepted(
        "theft claim accepted: police notified, report and ownership proof on file; \
         device identity verified against the insured device",
    )
}
