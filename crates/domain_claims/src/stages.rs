//! Stage Navigator
//!
//! One declarative table per claim type maps the ordered collection stages
//! to entry and exit predicates over the shared draft. The navigator itself
//! is a position pointer; it performs no business computation, only
//! predicate evaluation. Forward transitions are guarded, back-navigation
//! is always allowed, and no state is discarded on going back.

use serde::{Deserialize, Serialize};
use std::fmt;

use domain_policy::ClaimType;

use crate::draft::{ClaimDraft, MatchConfirmation, PolicyContext};
use crate::error::ClaimError;
use crate::evidence::{
    narrative_meets_minimum, EvidenceRole, MIN_INCIDENT_DESCRIPTION_CHARS,
    MIN_RECOVERY_EFFORTS_CHARS,
};

/// Identifier of a collection stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    PolicySelection,
    DeviceConfirmation,
    // Breakdown
    FaultDetails,
    ProblemTiming,
    DefectPhotos,
    // Damage
    IncidentDetails,
    DamageAssessment,
    DamagePhotos,
    ProofOfOwnership,
    // Theft
    TheftCircumstances,
    EvidencePhotos,
    Documentation,
    // Shared tail
    SupportingDocuments,
    Declaration,
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageId::PolicySelection => "policy_selection",
            StageId::DeviceConfirmation => "device_confirmation",
            StageId::FaultDetails => "fault_details",
            StageId::ProblemTiming => "problem_timing",
            StageId::DefectPhotos => "defect_photos",
            StageId::IncidentDetails => "incident_details",
            StageId::DamageAssessment => "damage_assessment",
            StageId::DamagePhotos => "damage_photos",
            StageId::ProofOfOwnership => "proof_of_ownership",
            StageId::TheftCircumstances => "theft_circumstances",
            StageId::EvidencePhotos => "evidence_photos",
            StageId::Documentation => "documentation",
            StageId::SupportingDocuments => "supporting_documents",
            StageId::Declaration => "declaration",
        };
        write!(f, "{name}")
    }
}

/// A stage predicate over the shared draft and the read-only policy context
pub type StagePredicate = fn(&ClaimDraft, &PolicyContext) -> bool;

/// Descriptor for one collection stage
pub struct StageDescriptor {
    /// Stage identifier
    pub id: StageId,
    /// What must already be true to display the stage
    pub entry: StagePredicate,
    /// What must be true to advance past the stage
    pub exit: StagePredicate,
}

fn always(_: &ClaimDraft, _: &PolicyContext) -> bool {
    true
}

fn policy_selected(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    draft.policy_selected
}

/// Device confirmation: the tri-state flag must leave `Unconfirmed`, and
/// the manual device fields its answer requires must be present. Policies
/// with no insured device skip the question but still need device details.
fn device_confirmed(draft: &ClaimDraft, context: &PolicyContext) -> bool {
    if context.insured_device.is_some() {
        match draft.device.confirmation {
            MatchConfirmation::Unconfirmed => false,
            MatchConfirmation::Correct => draft.device.manual_fields_complete(),
            MatchConfirmation::Incorrect => draft.device.full_entry_complete(),
        }
    } else {
        draft.device.standalone_entry_complete()
    }
}

fn fault_details_complete(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    let fault = &draft.fault;
    fault.category.as_deref().is_some_and(|s| !s.trim().is_empty())
        && fault
            .specific_issue
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
}

/// Problem timing requires date and frequency, and an acknowledged advisory
/// while the fault falls inside the manufacturer warranty.
fn problem_timing_complete(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    let within_warranty = draft
        .warranty
        .as_ref()
        .map(|w| w.within_warranty)
        .unwrap_or(false);
    draft.fault.first_observed.is_some()
        && draft.fault.frequency.is_some()
        && (!within_warranty || draft.warranty_acknowledged)
}

fn defect_photo_present(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    draft.has_attachment(EvidenceRole::DefectPhoto)
}

fn incident_details_complete(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    draft.damage.incident_at.is_some()
        && narrative_meets_minimum(
            draft.damage.description.as_deref(),
            MIN_INCIDENT_DESCRIPTION_CHARS,
        )
}

fn damage_assessment_complete(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    let damage = &draft.damage;
    damage
        .damage_type
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty())
        && damage
            .affected_area
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
}

fn damage_photo_present(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    draft.has_attachment(EvidenceRole::DamagePhoto)
}

fn ownership_proof_present(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    draft.has_attachment(EvidenceRole::ProofOfOwnership)
}

fn theft_circumstances_complete(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    let theft = &draft.theft;
    narrative_meets_minimum(
        theft.incident_description.as_deref(),
        MIN_INCIDENT_DESCRIPTION_CHARS,
    ) && narrative_meets_minimum(theft.recovery_efforts.as_deref(), MIN_RECOVERY_EFFORTS_CHARS)
        && theft.police_notified.is_some()
}

fn theft_photos_present(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    draft.has_attachment(EvidenceRole::ItemPhoto)
        && draft.has_attachment(EvidenceRole::TheftScenePhoto)
}

/// Theft documentation: ownership proof always; the police report PDF is
/// mandatory only when the police were notified.
fn theft_documentation_complete(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    let police_report_ok = match draft.theft.police_notified {
        Some(true) => draft.has_attachment(EvidenceRole::PoliceReport),
        _ => true,
    };
    draft.has_attachment(EvidenceRole::ProofOfOwnership) && police_report_ok
}

fn declaration_complete(draft: &ClaimDraft, _: &PolicyContext) -> bool {
    draft.declaration.is_complete()
}

const BREAKDOWN_STAGES: &[StageDescriptor] = &[
    StageDescriptor {
        id: StageId::PolicySelection,
        entry: always,
        exit: policy_selected,
    },
    StageDescriptor {
        id: StageId::DeviceConfirmation,
        entry: policy_selected,
        exit: device_confirmed,
    },
    StageDescriptor {
        id: StageId::FaultDetails,
        entry: policy_selected,
        exit: fault_details_complete,
    },
    StageDescriptor {
        id: StageId::ProblemTiming,
        entry: policy_selected,
        exit: problem_timing_complete,
    },
    StageDescriptor {
        id: StageId::DefectPhotos,
        entry: policy_selected,
        exit: defect_photo_present,
    },
    StageDescriptor {
        id: StageId::SupportingDocuments,
        entry: policy_selected,
        exit: always,
    },
    StageDescriptor {
        id: StageId::Declaration,
        entry: policy_selected,
        exit: declaration_complete,
    },
];

const DAMAGE_STAGES: &[StageDescriptor] = &[
    StageDescriptor {
        id: StageId::PolicySelection,
        entry: always,
        exit: policy_selected,
    },
    StageDescriptor {
        id: StageId::DeviceConfirmation,
        entry: policy_selected,
        exit: device_confirmed,
    },
    StageDescriptor {
        id: StageId::IncidentDetails,
        entry: policy_selected,
        exit: incident_details_complete,
    },
    StageDescriptor {
        id: StageId::DamageAssessment,
        entry: policy_selected,
        exit: damage_assessment_complete,
    },
    StageDescriptor {
        id: StageId::DamagePhotos,
        entry: policy_selected,
        exit: damage_photo_present,
    },
    StageDescriptor {
        id: StageId::ProofOfOwnership,
        entry: policy_selected,
        exit: ownership_proof_present,
    },
    StageDescriptor {
        id: StageId::SupportingDocuments,
        entry: policy_selected,
        exit: always,
    },
    StageDescriptor {
        id: StageId::Declaration,
        entry: policy_selected,
        exit: declaration_complete,
    },
];

const THEFT_STAGES: &[StageDescriptor] = &[
    StageDescriptor {
        id: StageId::PolicySelection,
        entry: always,
        exit: policy_selected,
    },
    StageDescriptor {
        id: StageId::DeviceConfirmation,
        entry: policy_selected,
        exit: device_confirmed,
    },
    StageDescriptor {
        id: StageId::TheftCircumstances,
        entry: policy_selected,
        exit: theft_circumstances_complete,
    },
    StageDescriptor {
        id: StageId::EvidencePhotos,
        entry: policy_selected,
        exit: theft_photos_present,
    },
    StageDescriptor {
        id: StageId::Documentation,
        entry: policy_selected,
        exit: theft_documentation_complete,
    },
    StageDescriptor {
        id: StageId::Declaration,
        entry: policy_selected,
        exit: declaration_complete,
    },
];

/// The ordered stage table for a claim type
pub fn stage_table(claim_type: ClaimType) -> &'static [StageDescriptor] {
    match claim_type {
        ClaimType::Breakdown => BREAKDOWN_STAGES,
        ClaimType::Damage => DAMAGE_STAGES,
        ClaimType::Theft => THEFT_STAGES,
    }
}

/// Current navigator position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// At stage index
    Stage(usize),
    /// Past the final stage, on the post-decision display
    Terminal,
}

/// Position pointer over a claim type's stage table
pub struct StageNavigator {
    table: &'static [StageDescriptor],
    position: Position,
}

impl StageNavigator {
    /// Creates a navigator at stage 0
    pub fn new(claim_type: ClaimType) -> Self {
        Self {
            table: stage_table(claim_type),
            position: Position::Stage(0),
        }
    }

    /// Creates a navigator with stage 0 bypassed
    ///
    /// Fast path for sessions where the policy was pre-selected externally.
    /// The caller is responsible for marking the draft's policy as selected.
    pub fn with_policy_preselected(claim_type: ClaimType) -> Self {
        Self {
            table: stage_table(claim_type),
            position: Position::Stage(1),
        }
    }

    /// The stage currently displayed, or `None` on the terminal display
    pub fn current_stage(&self) -> Option<&'static StageDescriptor> {
        match self.position {
            Position::Stage(index) => self.table.get(index),
            Position::Terminal => None,
        }
    }

    /// Index of the current stage, if not terminal
    pub fn current_index(&self) -> Option<usize> {
        match self.position {
            Position::Stage(index) => Some(index),
            Position::Terminal => None,
        }
    }

    /// Number of stages in the active table
    pub fn stage_count(&self) -> usize {
        self.table.len()
    }

    /// True once the navigator reached the post-decision display
    pub fn is_terminal(&self) -> bool {
        self.position == Position::Terminal
    }

    /// Advances to the next stage, guarded by the current stage's exit
    /// predicate and the next stage's entry predicate
    ///
    /// # Errors
    ///
    /// [`ClaimError::AdvanceRefused`] when either predicate fails;
    /// [`ClaimError::AlreadyTerminal`] past the final stage.
    pub fn advance(&mut self, draft: &ClaimDraft, context: &PolicyContext) -> Result<(), ClaimError> {
        let Position::Stage(index) = self.position else {
            return Err(ClaimError::AlreadyTerminal);
        };
        let stage = &self.table[index];

        if !(stage.exit)(draft, context) {
            tracing::debug!(stage = %stage.id, "advance refused, stage incomplete");
            return Err(ClaimError::AdvanceRefused { stage: stage.id });
        }

        match self.table.get(index + 1) {
            Some(next) => {
                if !(next.entry)(draft, context) {
                    return Err(ClaimError::AdvanceRefused { stage: next.id });
                }
                self.position = Position::Stage(index + 1);
            }
            None => {
                self.position = Position::Terminal;
            }
        }
        Ok(())
    }

    /// Steps back one stage; always allowed, discards nothing
    ///
    /// Returns false when already at the first displayed stage or on the
    /// terminal display.
    pub fn retreat(&mut self) -> bool {
        match self.position {
            Position::Stage(index) if index > 0 => {
                self.position = Position::Stage(index - 1);
                true
            }
            _ => false,
        }
    }

    /// Evaluates every stage's exit predicate against the draft
    ///
    /// Used at submission time to re-validate stages that were passed
    /// earlier and may have been invalidated by later edits. Returns the
    /// identifiers of incomplete stages.
    pub fn incomplete_stages(
        &self,
        draft: &ClaimDraft,
        context: &PolicyContext,
    ) -> Vec<StageId> {
        self.table
            .iter()
            .filter(|stage| !(stage.exit)(draft, context))
            .map(|stage| stage.id)
            .collect()
    }
}
