//! Claims domain errors

use thiserror::Error;

use crate::stages::StageId;
use domain_policy::ClaimType;

/// Errors that can occur in the claim intake domain
///
/// All of these are validation errors in the taxonomy of the workflow:
/// surfaced inline, blocking stage advance, and fully recoverable by user
/// correction. Nothing here is retried automatically.
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Cannot advance: stage {stage} is incomplete")]
    AdvanceRefused { stage: StageId },

    #[error("Cannot advance past the final stage")]
    AlreadyTerminal,

    #[error("File type {mime} is not accepted for {role}")]
    UnsupportedFileType { role: String, mime: String },

    #[error("Police report must be a PDF")]
    PoliceReportMustBePdf,

    #[error("File of {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Update {update} does not apply to a {claim_type} claim")]
    UpdateMismatch {
        update: &'static str,
        claim_type: ClaimType,
    },
}
