//! Submission Finalizer
//!
//! Runs the ordered submission pipeline once the claimant confirms the final
//! declaration: eligibility re-check, full stage re-validation, sequential
//! file uploads with an attempted-vs-uploaded count check, the automatic
//! decision, and persistence. Device-record propagation and claimant
//! notification are best-effort; their failure never fails the submission.

use uuid::Uuid;

use domain_claims::decision::decide;
use domain_claims::draft::{ClaimDraft, MatchConfirmation, PolicyContext};
use domain_claims::evidence::Attachment;
use domain_claims::record::{
    assemble_description, document_classification, ClaimDocument, ClaimRecord,
};
use domain_claims::stages::StageNavigator;
use domain_claims::verification::verify;
use domain_policy::{is_claim_type_allowed, InsuredDevice};

use crate::error::SubmissionError;
use crate::ports::IntakePorts;

/// Finalizes a completed draft into a persisted, decided claim
///
/// # Errors
///
/// - [`SubmissionError::NotEligible`] when the gate refuses the claim type
/// - [`SubmissionError::StageRevalidation`] when a stage exit predicate no
///   longer holds, for example after a back-navigation edit
/// - [`SubmissionError::IncompleteUpload`] when not every attached file was
///   uploaded; no claim record exists in that case
/// - [`SubmissionError::Persistence`] when the repository write fails
pub async fn finalize(
    context: &PolicyContext,
    draft: &ClaimDraft,
    navigator: &StageNavigator,
    submission_token: Uuid,
    ports: &IntakePorts,
) -> Result<ClaimRecord, SubmissionError> {
    if !is_claim_type_allowed(&context.policy, draft.claim_type) {
        return Err(SubmissionError::NotEligible {
            claim_type: draft.claim_type,
        });
    }

    let incomplete = navigator.incomplete_stages(draft, context);
    if !incomplete.is_empty() {
        tracing::warn!(stages = ?incomplete, "submission refused, stages incomplete");
        return Err(SubmissionError::StageRevalidation { stages: incomplete });
    }

    let uploaded = upload_files(draft, submission_token, ports).await;
    let attempted = draft.total_attachments();
    if uploaded.len() != attempted {
        tracing::warn!(
            attempted,
            uploaded = uploaded.len(),
            "upload count mismatch, aborting submission"
        );
        return Err(SubmissionError::IncompleteUpload {
            attempted,
            uploaded: uploaded.len(),
        });
    }

    let verification = verify(&draft.device, context.insured_device.as_ref());
    let decision = decide(draft, &verification, draft.warranty.as_ref());
    tracing::info!(outcome = ?decision.outcome, "automatic decision computed");

    if draft.device.confirmation == MatchConfirmation::Incorrect {
        propagate_device_correction(context, draft, ports).await;
    }

    let record = ClaimRecord::create(
        context.policy.id,
        draft.claim_type,
        assemble_description(draft),
        decision,
    );
    let documents = build_documents(&record, draft, &uploaded);
    let record = ports
        .repository
        .insert_claim(record, documents, submission_token)
        .await
        .map_err(SubmissionError::Persistence)?;

    if let Err(error) = ports.notification.notify_claim_submitted(&record).await {
        tracing::warn!(%error, "submission notification failed");
    }

    tracing::info!(
        claim_number = %record.claim_number,
        status = %record.status,
        "claim submitted"
    );
    Ok(record)
}

/// Uploads every attachment sequentially; failed files are logged and
/// skipped, and surface through the caller's count check
async fn upload_files<'a>(
    draft: &'a ClaimDraft,
    submission_token: Uuid,
    ports: &IntakePorts,
) -> Vec<(&'a Attachment, String)> {
    let prefix = submission_token.to_string();
    let mut uploaded = Vec::with_capacity(draft.total_attachments());
    for attachment in draft.all_attachments() {
        match ports.storage.store(&prefix, attachment).await {
            Ok(path) => uploaded.push((attachment, path)),
            Err(error) => {
                tracing::warn!(%error, file = %attachment.file_name, "file upload failed");
            }
        }
    }
    uploaded
}

/// One document row per uploaded file; the first photo carries the
/// image-analysis metadata
fn build_documents(
    record: &ClaimRecord,
    draft: &ClaimDraft,
    uploaded: &[(&Attachment, String)],
) -> Vec<ClaimDocument> {
    let mut analysis_metadata = draft.analysis_metadata.clone();
    uploaded
        .iter()
        .map(|(attachment, path)| {
            let (document_type, subtype) = document_classification(attachment.role);
            let metadata = if attachment.role.is_photo() {
                analysis_metadata.take()
            } else {
                None
            };
            ClaimDocument {
                id: attachment.id,
                claim_id: record.id,
                document_type,
                document_subtype: subtype.to_string(),
                file_path: path.clone(),
                file_size: attachment.size_bytes,
                metadata,
            }
        })
        .collect()
}

/// Pushes corrected device attributes back to the insured-device record
/// when the claimant marked the registered device as incorrect
async fn propagate_device_correction(
    context: &PolicyContext,
    draft: &ClaimDraft,
    ports: &IntakePorts,
) {
    let Some(insured) = &context.insured_device else {
        return;
    };
    let corrected = InsuredDevice {
        id: insured.id,
        product_name: draft
            .device
            .category
            .clone()
            .unwrap_or_else(|| insured.product_name.clone()),
        model: draft
            .device
            .model
            .clone()
            .unwrap_or_else(|| insured.model.clone()),
        serial_number: draft
            .device
            .serial
            .clone()
            .or_else(|| insured.serial_number.clone()),
        purchase_price: draft.device.purchase_price.or(insured.purchase_price),
        purchase_date: insured.purchase_date,
        added_date: insured.added_date,
    };
    match ports
        .policy
        .update_insured_device(context.policy.id, corrected, None)
        .await
    {
        Ok(()) => tracing::info!("corrected device details propagated"),
        Err(error) => {
            tracing::warn!(%error, "device correction could not be propagated");
        }
    }
}
