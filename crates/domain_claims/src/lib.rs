//! Claim Intake Domain
//!
//! This crate implements the branching, multi-stage claim intake workflow:
//! the draft aggregate the wizard session mutates, the declarative stage
//! navigator that gates progression on completion predicates, the evidence
//! rules per claim type, device identity verification, manufacturer
//! warranty overlap, and the decision engine that produces the automatic
//! adjudication outcome.
//!
//! # Workflow
//!
//! ```text
//! select type -> collect stages (navigator-gated) -> verify + warranty
//!             -> decide (accepted / rejected / referred) -> persist
//! ```

pub mod decision;
pub mod draft;
pub mod error;
pub mod evidence;
pub mod record;
pub mod stages;
pub mod verification;
pub mod warranty;

pub use decision::{decide, ClaimStatus, Decision, DecisionOutcome};
pub use draft::{
    ClaimDraft, DamageReport, Declaration, DeviceClaimInfo, DraftUpdate, FaultFrequency,
    FaultReport, MatchConfirmation, PolicyContext, Severity, TheftReport,
};
pub use error::ClaimError;
pub use evidence::{Attachment, EvidenceRole, FileContentType, MAX_FILE_BYTES};
pub use record::{ClaimDocument, ClaimRecord, DocumentType};
pub use stages::{stage_table, StageDescriptor, StageId, StageNavigator};
pub use verification::{verify, VerificationResult};
pub use warranty::WarrantyResult;

// The claim-type vocabulary lives with the coverage gate.
pub use domain_policy::ClaimType;
