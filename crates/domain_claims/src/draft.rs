//! The claim draft aggregate
//!
//! A single mutable aggregate owns all data collected during an intake
//! session. The wizard session exclusively owns the draft for its duration;
//! no other process mutates it concurrently. All field changes flow through
//! [`DraftUpdate`] values applied by [`ClaimDraft::apply`], keyed by the
//! stage that collects them, so the workflow is testable without any
//! rendering concern.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use domain_policy::{ClaimType, InsuredDevice, Policy};

use crate::error::ClaimError;
use crate::evidence::{Attachment, EvidenceRole};
use crate::warranty::WarrantyResult;

/// Read-only policy context for a session: the active policy and the
/// insured device, loaded once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyContext {
    pub policy: Policy,
    pub insured_device: Option<InsuredDevice>,
}

/// Tri-state answer to "is this the insured device?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfirmation {
    /// Question not answered yet
    #[default]
    Unconfirmed,
    /// The claimed device is the insured device
    Correct,
    /// The claimed device differs from the insured record
    Incorrect,
}

/// Claimed device details collected during intake
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceClaimInfo {
    /// Device category or registered product name (e.g. "iPhone 14")
    pub category: Option<String>,
    /// Manufacturer
    pub make: Option<String>,
    /// Model designation
    pub model: Option<String>,
    /// Serial number
    pub serial: Option<String>,
    /// Color
    pub color: Option<String>,
    /// Purchase price
    pub purchase_price: Option<Decimal>,
    /// Whether the claimant confirmed this matches the insured device
    pub confirmation: MatchConfirmation,
}

impl DeviceClaimInfo {
    fn has(field: &Option<String>) -> bool {
        field.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    /// True when the manually entered fields required after a `Correct`
    /// confirmation are present (model/serial arrive by auto-copy)
    pub fn manual_fields_complete(&self) -> bool {
        Self::has(&self.category) && Self::has(&self.make) && Self::has(&self.color)
    }

    /// True when every field required after an `Incorrect` confirmation
    /// (full manual re-entry) is present
    pub fn full_entry_complete(&self) -> bool {
        self.manual_fields_complete() && Self::has(&self.model) && self.purchase_price.is_some()
    }

    /// True when enough device detail exists for a policy with no insured
    /// device record
    pub fn standalone_entry_complete(&self) -> bool {
        self.manual_fields_complete() && Self::has(&self.model)
    }
}

/// Breakdown narrative fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaultReport {
    /// Fault category (e.g. "battery", "screen", "audio")
    pub category: Option<String>,
    /// Specific issue description
    pub specific_issue: Option<String>,
    /// Severity as assessed by the claimant
    pub severity: Option<Severity>,
    /// Date the problem was first observed
    pub first_observed: Option<NaiveDate>,
    /// How often the fault occurs
    pub frequency: Option<FaultFrequency>,
}

/// Fault severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Moderate,
    Severe,
}

/// How often a fault manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultFrequency {
    Once,
    Intermittent,
    Constant,
}

/// Damage narrative fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageReport {
    /// What kind of damage (e.g. "cracked screen", "liquid")
    pub damage_type: Option<String>,
    /// Affected area of the device
    pub affected_area: Option<String>,
    /// When the incident happened
    pub incident_at: Option<DateTime<Utc>>,
    /// Free-text incident description
    pub description: Option<String>,
}

/// Theft narrative fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TheftReport {
    /// Circumstances of the theft
    pub incident_description: Option<String>,
    /// What the claimant did to recover the device
    pub recovery_efforts: Option<String>,
    /// Whether the police were notified
    pub police_notified: Option<bool>,
}

/// Final declaration before submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Declaration {
    /// Terms and conditions accepted
    pub terms_agreed: bool,
    /// Claimant signature name
    pub signature_name: Option<String>,
}

impl Declaration {
    /// True when the declaration is signed and agreed
    pub fn is_complete(&self) -> bool {
        self.terms_agreed
            && self
                .signature_name
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty())
    }
}

/// A reducer-style transition applied to the draft, keyed by the stage
/// that collects it
#[derive(Debug, Clone)]
pub enum DraftUpdate {
    /// Stage 0: the claimant picked (or confirmed) the policy
    SelectPolicy,
    /// Device confirmation: answer the tri-state match question
    ConfirmDevice { matches: bool },
    /// Device confirmation: manual device detail entry
    SetDeviceDetails {
        category: Option<String>,
        make: Option<String>,
        model: Option<String>,
        serial: Option<String>,
        color: Option<String>,
        purchase_price: Option<Decimal>,
    },
    /// Breakdown: fault category, specific issue, severity
    SetFaultDetails {
        category: Option<String>,
        specific_issue: Option<String>,
        severity: Option<Severity>,
    },
    /// Breakdown: when the problem started and how often it occurs
    SetProblemTiming {
        first_observed: Option<NaiveDate>,
        frequency: Option<FaultFrequency>,
    },
    /// Breakdown: the claimant acknowledged the active-warranty advisory
    AcknowledgeWarrantyAdvisory,
    /// Damage: incident date/time and description
    SetIncidentDetails {
        incident_at: Option<DateTime<Utc>>,
        description: Option<String>,
    },
    /// Damage: damage type and affected area
    SetDamageAssessment {
        damage_type: Option<String>,
        affected_area: Option<String>,
    },
    /// Theft: circumstances, recovery efforts, police notification
    SetTheftCircumstances {
        incident_description: Option<String>,
        recovery_efforts: Option<String>,
        police_notified: Option<bool>,
    },
    /// Declaration stage
    SetDeclaration {
        terms_agreed: bool,
        signature_name: Option<String>,
    },
}

impl DraftUpdate {
    fn name(&self) -> &'static str {
        match self {
            DraftUpdate::SelectPolicy => "select_policy",
            DraftUpdate::ConfirmDevice { .. } => "confirm_device",
            DraftUpdate::SetDeviceDetails { .. } => "set_device_details",
            DraftUpdate::SetFaultDetails { .. } => "set_fault_details",
            DraftUpdate::SetProblemTiming { .. } => "set_problem_timing",
            DraftUpdate::AcknowledgeWarrantyAdvisory => "acknowledge_warranty_advisory",
            DraftUpdate::SetIncidentDetails { .. } => "set_incident_details",
            DraftUpdate::SetDamageAssessment { .. } => "set_damage_assessment",
            DraftUpdate::SetTheftCircumstances { .. } => "set_theft_circumstances",
            DraftUpdate::SetDeclaration { .. } => "set_declaration",
        }
    }
}

/// The single mutable aggregate for an intake session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimDraft {
    /// The claim type chosen for the session
    pub claim_type: ClaimType,
    /// Whether the policy-selection stage completed
    pub policy_selected: bool,
    /// Claimed device details
    pub device: DeviceClaimInfo,
    /// Breakdown narrative (unused for other types)
    pub fault: FaultReport,
    /// Damage narrative (unused for other types)
    pub damage: DamageReport,
    /// Theft narrative (unused for other types)
    pub theft: TheftReport,
    /// File attachments keyed by evidence role
    pub attachments: BTreeMap<EvidenceRole, Vec<Attachment>>,
    /// Warranty overlap computed once the fault date is known (breakdown)
    pub warranty: Option<WarrantyResult>,
    /// Whether the claimant acknowledged the active-warranty advisory
    pub warranty_acknowledged: bool,
    /// AI image-analysis report captured during collection, persisted as
    /// metadata on the first photo document (advisory only)
    pub analysis_metadata: Option<serde_json::Value>,
    /// Final declaration
    pub declaration: Declaration,
}

impl ClaimDraft {
    /// Creates an empty draft for a claim type
    pub fn new(claim_type: ClaimType) -> Self {
        Self {
            claim_type,
            policy_selected: false,
            device: DeviceClaimInfo::default(),
            fault: FaultReport::default(),
            damage: DamageReport::default(),
            theft: TheftReport::default(),
            attachments: BTreeMap::new(),
            warranty: None,
            warranty_acknowledged: false,
            analysis_metadata: None,
            declaration: Declaration::default(),
        }
    }

    /// Applies a reducer-style update to the draft
    ///
    /// Updates for another claim type's stages are rejected with
    /// [`ClaimError::UpdateMismatch`]; everything else mutates the draft
    /// and cannot fail. Edits to earlier fields never discard later state.
    pub fn apply(&mut self, update: DraftUpdate, context: &PolicyContext) -> Result<(), ClaimError> {
        self.check_claim_type(&update)?;

        match update {
            DraftUpdate::SelectPolicy => {
                self.policy_selected = true;
            }
            DraftUpdate::ConfirmDevice { matches } => {
                if matches {
                    self.device.confirmation = MatchConfirmation::Correct;
                    // The insured record carries model and serial; category,
                    // make, and color still require manual entry.
                    if let Some(insured) = &context.insured_device {
                        self.device.model = Some(insured.model.clone());
                        self.device.serial = insured.serial_number.clone();
                    }
                } else {
                    self.device = DeviceClaimInfo {
                        confirmation: MatchConfirmation::Incorrect,
                        ..DeviceClaimInfo::default()
                    };
                }
            }
            DraftUpdate::SetDeviceDetails {
                category,
                make,
                model,
                serial,
                color,
                purchase_price,
            } => {
                let device = &mut self.device;
                if category.is_some() {
                    device.category = category;
                }
                if make.is_some() {
                    device.make = make;
                }
                if model.is_some() {
                    device.model = model;
                }
                if serial.is_some() {
                    device.serial = serial;
                }
                if color.is_some() {
                    device.color = color;
                }
                if purchase_price.is_some() {
                    device.purchase_price = purchase_price;
                }
            }
            DraftUpdate::SetFaultDetails {
                category,
                specific_issue,
                severity,
            } => {
                if category.is_some() {
                    self.fault.category = category;
                }
                if specific_issue.is_some() {
                    self.fault.specific_issue = specific_issue;
                }
                if severity.is_some() {
                    self.fault.severity = severity;
                }
            }
            DraftUpdate::SetProblemTiming {
                first_observed,
                frequency,
            } => {
                if first_observed.is_some() {
                    self.fault.first_observed = first_observed;
                    // The fault date changed; any prior advisory
                    // acknowledgement no longer applies.
                    self.warranty = None;
                    self.warranty_acknowledged = false;
                }
                if frequency.is_some() {
                    self.fault.frequency = frequency;
                }
            }
            DraftUpdate::AcknowledgeWarrantyAdvisory => {
                self.warranty_acknowledged = true;
            }
            DraftUpdate::SetIncidentDetails {
                incident_at,
                description,
            } => {
                if incident_at.is_some() {
                    self.damage.incident_at = incident_at;
                }
                if description.is_some() {
                    self.damage.description = description;
                }
            }
            DraftUpdate::SetDamageAssessment {
                damage_type,
                affected_area,
            } => {
                if damage_type.is_some() {
                    self.damage.damage_type = damage_type;
                }
                if affected_area.is_some() {
                    self.damage.affected_area = affected_area;
                }
            }
            DraftUpdate::SetTheftCircumstances {
                incident_description,
                recovery_efforts,
                police_notified,
            } => {
                if incident_description.is_some() {
                    self.theft.incident_description = incident_description;
                }
                if recovery_efforts.is_some() {
                    self.theft.recovery_efforts = recovery_efforts;
                }
                if police_notified.is_some() {
                    self.theft.police_notified = police_notified;
                }
            }
            DraftUpdate::SetDeclaration {
                terms_agreed,
                signature_name,
            } => {
                self.declaration.terms_agreed = terms_agreed;
                if signature_name.is_some() {
                    self.declaration.signature_name = signature_name;
                }
            }
        }

        Ok(())
    }

    /// Attaches a validated file to its evidence-role bucket
    ///
    /// File constraint violations reject the individual file with no
    /// partial acceptance.
    pub fn attach(
        &mut self,
        role: EvidenceRole,
        file_name: impl Into<String>,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<core_kernel::DocumentId, ClaimError> {
        let attachment = Attachment::new(role, file_name, mime, bytes)?;
        let id = attachment.id;
        self.attachments.entry(role).or_default().push(attachment);
        Ok(id)
    }

    /// Number of attachments in a role bucket
    pub fn attachment_count(&self, role: EvidenceRole) -> usize {
        self.attachments.get(&role).map(Vec::len).unwrap_or(0)
    }

    /// True when at least one attachment exists for the role
    pub fn has_attachment(&self, role: EvidenceRole) -> bool {
        self.attachment_count(role) > 0
    }

    /// All attachments across buckets, in role order
    pub fn all_attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.values().flatten()
    }

    /// Total number of attached files
    pub fn total_attachments(&self) -> usize {
        self.attachments.values().map(Vec::len).sum()
    }

    fn check_claim_type(&self, update: &DraftUpdate) -> Result<(), ClaimError> {
        let required = match update {
            DraftUpdate::SetFaultDetails { .. }
            | DraftUpdate::SetProblemTiming { .. }
            | DraftUpdate::AcknowledgeWarrantyAdvisory => Some(ClaimType::Breakdown),
            DraftUpdate::SetIncidentDetails { .. } | DraftUpdate::SetDamageAssessment { .. } => {
                Some(ClaimType::Damage)
            }
            DraftUpdate::SetTheftCircumstances { .. } => Some(ClaimType::Theft),
            _ => None,
        };

        match required {
            Some(required) if required != self.claim_type => Err(ClaimError::UpdateMismatch {
                update: update.name(),
                claim_type: self.claim_type,
            }),
            _ => Ok(()),
        }
    }
}
