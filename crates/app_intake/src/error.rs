//! Intake application errors

use thiserror::Error;

use core_kernel::PortError;
use domain_claims::{ClaimError, ClaimType, StageId};

/// Errors from the submission finalizer
///
/// Everything here is terminal for the attempt: no record exists and the
/// claimant may retry. Best-effort steps (device-record propagation,
/// notification) never surface as errors.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The policy does not cover the claim type (re-checked at submission)
    #[error("claim type {claim_type} is not covered by the policy")]
    NotEligible { claim_type: ClaimType },

    /// A previously passed stage is no longer complete
    #[error("stages no longer complete at submission: {stages:?}")]
    StageRevalidation { stages: Vec<StageId> },

    /// Fewer files were uploaded than attached; nothing was persisted
    #[error("uploaded {uploaded} of {attempted} files; submission aborted")]
    IncompleteUpload { attempted: usize, uploaded: usize },

    /// The claim record could not be persisted
    #[error("claim persistence failed: {0}")]
    Persistence(#[source] PortError),
}

/// Errors surfaced by the intake session
#[derive(Debug, Error)]
pub enum IntakeError {
    /// A draft operation was attempted before a claim type was chosen
    #[error("no claim type selected for this session")]
    NoClaimTypeSelected,

    /// The policy does not cover the requested claim type
    #[error("claim type {claim_type} is not covered by the policy")]
    NotEligible { claim_type: ClaimType },

    /// Submission was attempted before the final stage completed
    #[error("submission attempted before the final stage was completed")]
    SubmissionBeforeCompletion,

    /// A draft validation error; recoverable within the session
    #[error(transparent)]
    Claim(#[from] ClaimError),

    /// A port operation failed
    #[error(transparent)]
    Port(#[from] PortError),

    /// The finalizer refused or failed the submission
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
