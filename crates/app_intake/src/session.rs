//! The intake session
//!
//! One session drives one claim from policy-context load to submission. The
//! session exclusively owns the draft and the navigator; every mutation
//! funnels through it, which keeps the whole wizard testable without any
//! rendering concern.

use std::sync::Arc;

use uuid::Uuid;

use core_kernel::{DocumentId, PolicyId, SessionId};
use domain_claims::draft::{ClaimDraft, DraftUpdate, PolicyContext};
use domain_claims::evidence::EvidenceRole;
use domain_claims::record::ClaimRecord;
use domain_claims::stages::{StageId, StageNavigator};
use domain_claims::warranty;
use domain_claims::{ClaimError, ClaimType};
use domain_policy::ports::resolve_warranty_months;
use domain_policy::{allowed_claim_types, is_claim_type_allowed};

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::finalizer;
use crate::ports::IntakePorts;

struct ActiveClaim {
    draft: ClaimDraft,
    navigator: StageNavigator,
    submission_token: Option<Uuid>,
}

/// A single claim intake session
pub struct IntakeSession {
    id: SessionId,
    context: PolicyContext,
    ports: IntakePorts,
    config: IntakeConfig,
    active: Option<ActiveClaim>,
}

impl IntakeSession {
    /// Starts a session by loading the policy context once
    ///
    /// # Errors
    ///
    /// [`IntakeError::Port`] when the policy or device fetch fails.
    pub async fn start(
        policy_id: PolicyId,
        ports: IntakePorts,
        config: IntakeConfig,
    ) -> Result<Self, IntakeError> {
        let policy = ports.policy.get_policy(policy_id, None).await?;
        let insured_device = ports.policy.get_insured_device(policy_id, None).await?;
        let id = SessionId::new();
        tracing::info!(
            session = %id,
            policy = %policy.policy_number,
            has_device = insured_device.is_some(),
            "intake session started"
        );
        Ok(Self {
            id,
            context: PolicyContext {
                policy,
                insured_device,
            },
            ports,
            config,
            active: None,
        })
    }

    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The loaded policy context
    pub fn context(&self) -> &PolicyContext {
        &self.context
    }

    /// Claim types the policy's cover permits
    pub fn selectable_claim_types(&self) -> Vec<ClaimType> {
        allowed_claim_types(&self.context.policy)
    }

    /// Chooses the claim type and installs its stage table
    ///
    /// The policy was selected at session start, so the navigator begins
    /// past the policy-selection stage. Selecting again discards any
    /// in-progress draft.
    ///
    /// # Errors
    ///
    /// [`IntakeError::NotEligible`] when the coverage gate refuses the type.
    pub fn select_claim_type(&mut self, claim_type: ClaimType) -> Result<(), IntakeError> {
        if !is_claim_type_allowed(&self.context.policy, claim_type) {
            return Err(IntakeError::NotEligible { claim_type });
        }
        let mut draft = ClaimDraft::new(claim_type);
        draft.apply(DraftUpdate::SelectPolicy, &self.context)?;
        self.active = Some(ActiveClaim {
            draft,
            navigator: StageNavigator::with_policy_preselected(claim_type),
            submission_token: None,
        });
        tracing::info!(%claim_type, "claim type selected");
        Ok(())
    }

    /// The in-progress draft
    pub fn draft(&self) -> Result<&ClaimDraft, IntakeError> {
        Ok(&self.active()?.draft)
    }

    /// Identifier of the stage currently displayed
    pub fn current_stage(&self) -> Option<StageId> {
        self.active
            .as_ref()
            .and_then(|a| a.navigator.current_stage())
            .map(|s| s.id)
    }

    /// True once the wizard reached the post-decision display
    pub fn is_terminal(&self) -> bool {
        self.active
            .as_ref()
            .map(|a| a.navigator.is_terminal())
            .unwrap_or(false)
    }

    /// Applies a draft update
    ///
    /// Setting the problem-observed date recomputes the warranty overlap
    /// through the warranty lookup port.
    pub async fn apply(&mut self, update: DraftUpdate) -> Result<(), IntakeError> {
        let recompute_warranty = matches!(
            &update,
            DraftUpdate::SetProblemTiming {
                first_observed: Some(_),
                ..
            }
        );
        let active = self.active.as_mut().ok_or(IntakeError::NoClaimTypeSelected)?;
        active.draft.apply(update, &self.context)?;
        if recompute_warranty {
            self.refresh_warranty().await;
        }
        Ok(())
    }

    /// Attaches a file to the draft
    ///
    /// # Errors
    ///
    /// [`IntakeError::Claim`] for type, role, or size violations; the file
    /// is rejected individually with no partial acceptance.
    pub fn attach(
        &mut self,
        role: EvidenceRole,
        file_name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<DocumentId, IntakeError> {
        let size = bytes.len() as u64;
        if size > self.config.max_upload_bytes {
            return Err(IntakeError::Claim(ClaimError::FileTooLarge {
                size,
                max: self.config.max_upload_bytes,
            }));
        }
        let active = self.active.as_mut().ok_or(IntakeError::NoClaimTypeSelected)?;
        Ok(active.draft.attach(role, file_name, mime, bytes)?)
    }

    /// Advances to the next stage
    ///
    /// The submission token is minted on first entry into the declaration
    /// stage; a later retry of the same submission reuses it.
    pub fn advance(&mut self) -> Result<(), IntakeError> {
        let context = &self.context;
        let active = self.active.as_mut().ok_or(IntakeError::NoClaimTypeSelected)?;
        active.navigator.advance(&active.draft, context)?;
        if active.navigator.current_stage().map(|s| s.id) == Some(StageId::Declaration)
            && active.submission_token.is_none()
        {
            active.submission_token = Some(Uuid::new_v4());
            tracing::debug!("submission token minted");
        }
        Ok(())
    }

    /// Steps back one stage; always allowed, nothing is discarded
    pub fn retreat(&mut self) -> bool {
        self.active
            .as_mut()
            .map(|a| a.navigator.retreat())
            .unwrap_or(false)
    }

    /// Runs image analysis on the first attached photo and fills empty
    /// draft fields with its hints
    ///
    /// Every hint is advisory: populated fields are never overwritten, the
    /// raw report is kept for persistence as document metadata, and an
    /// analysis failure is logged and swallowed.
    pub async fn enrich_from_analysis(&mut self) -> Result<(), IntakeError> {
        let photo = {
            let active = self.active.as_ref().ok_or(IntakeError::NoClaimTypeSelected)?;
            active
                .draft
                .all_attachments()
                .find(|a| a.role.is_photo())
                .cloned()
        };
        let Some(photo) = photo else {
            tracing::debug!("no photo attached, skipping analysis");
            return Ok(());
        };

        let analysis = Arc::clone(&self.ports.analysis);
        let report = match analysis.analyze(&photo).await {
            Ok(report) => report,
            Err(error) => {
                tracing::warn!(%error, "image analysis unavailable, continuing without hints");
                return Ok(());
            }
        };
        if let Some(warning) = &report.mismatch_warning {
            tracing::info!(warning = %warning, "analysis flagged a possible device mismatch");
        }

        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        let device = &mut active.draft.device;
        fill_if_empty(&mut device.category, report.device_category.clone());
        fill_if_empty(&mut device.make, report.brand.clone());
        fill_if_empty(&mut device.model, report.model.clone());
        fill_if_empty(&mut device.color, report.color.clone());
        if active.draft.claim_type == ClaimType::Breakdown && active.draft.fault.severity.is_none()
        {
            active.draft.fault.severity = report.suggested_severity;
        }
        active.draft.analysis_metadata = Some(report.to_metadata());
        Ok(())
    }

    /// Submits the completed claim
    ///
    /// Delegates to the finalizer; requires the navigator to have passed
    /// the declaration stage.
    pub async fn submit(&mut self) -> Result<ClaimRecord, IntakeError> {
        let active = self.active.as_mut().ok_or(IntakeError::NoClaimTypeSelected)?;
        if !active.navigator.is_terminal() {
            return Err(IntakeError::SubmissionBeforeCompletion);
        }
        let token = *active.submission_token.get_or_insert_with(Uuid::new_v4);
        let record = finalizer::finalize(
            &self.context,
            &active.draft,
            &active.navigator,
            token,
            &self.ports,
        )
        .await?;
        Ok(record)
    }

    fn active(&self) -> Result<&ActiveClaim, IntakeError> {
        self.active.as_ref().ok_or(IntakeError::NoClaimTypeSelected)
    }

    /// Recomputes the warranty overlap after the fault date changed
    ///
    /// A lookup outage falls back to the configured warranty duration so
    /// the claimant is not blocked mid-session.
    async fn refresh_warranty(&mut self) {
        let (fault_date, draft_model, draft_category) = {
            let Some(active) = self.active.as_ref() else {
                return;
            };
            let Some(fault_date) = active.draft.fault.first_observed else {
                return;
            };
            (
                fault_date,
                active.draft.device.model.clone(),
                active.draft.device.category.clone(),
            )
        };

        let insured = self.context.insured_device.as_ref();
        let model = draft_model
            .or_else(|| insured.map(|d| d.model.clone()))
            .unwrap_or_default();
        let category = draft_category
            .or_else(|| insured.map(|d| d.product_name.clone()))
            .unwrap_or_default();
        let purchase_date =
            insured.and_then(|d| d.effective_purchase_date(Some(self.context.policy.start_date)));

        let warranty_port = Arc::clone(&self.ports.warranty);
        let months = match resolve_warranty_months(warranty_port.as_ref(), &model, &category).await
        {
            Ok(months) => months,
            Err(error) => {
                tracing::warn!(%error, "warranty lookup unavailable, using configured fallback");
                self.config.fallback_warranty_months
            }
        };

        if let Some(active) = self.active.as_mut() {
            active.draft.warranty = Some(warranty::evaluate(fault_date, purchase_date, months));
        }
    }
}

fn fill_if_empty(field: &mut Option<String>, hint: Option<String>) {
    let occupied = field.as_deref().is_some_and(|s| !s.trim().is_empty());
    if occupied {
        return;
    }
    if let Some(hint) = hint.filter(|h| !h.trim().is_empty()) {
        *field = Some(hint);
    }
}
