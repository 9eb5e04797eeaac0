//! Comprehensive tests for the claim intake domain
//!
//! Walks each claim type's stage sequence end to end, exercising the
//! advance guards, back-navigation, evidence completeness, and the
//! submission-time re-validation hook.

use chrono::{NaiveDate, TimeZone, Utc};

use core_kernel::{DeviceId, PolicyId};
use domain_policy::{ClaimType, InsuredDevice, Policy, Product};

use domain_claims::draft::{ClaimDraft, DraftUpdate, PolicyContext, Severity};
use domain_claims::error::ClaimError;
use domain_claims::evidence::EvidenceRole;
use domain_claims::stages::{StageId, StageNavigator};
use domain_claims::warranty;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn context() -> PolicyContext {
    PolicyContext {
        policy: Policy::new(
            PolicyId::new(),
            "P-778899",
            date(2024, 1, 1),
            Product::new(
                "Device Cover Max",
                "max",
                vec![],
                vec![
                    "Mechanical Breakdown".to_string(),
                    "Accidental Damage".to_string(),
                    "Theft".to_string(),
                ],
            ),
        ),
        insured_device: Some(InsuredDevice {
            id: DeviceId::new(),
            product_name: "iPhone 14".to_string(),
            model: "A2882".to_string(),
            serial_number: Some("F2LXK7".to_string()),
            purchase_price: None,
            purchase_date: Some(date(2023, 2, 1)),
            added_date: None,
        }),
    }
}

fn confirm_device(draft: &mut ClaimDraft, ctx: &PolicyContext) {
    draft
        .apply(DraftUpdate::ConfirmDevice { matches: true }, ctx)
        .unwrap();
    draft
        .apply(
            DraftUpdate::SetDeviceDetails {
                category: Some("iPhone 14".to_string()),
                make: Some("Apple".to_string()),
                model: None,
                serial: None,
                color: Some("midnight".to_string()),
                purchase_price: None,
            },
            ctx,
        )
        .unwrap();
}

fn sign(draft: &mut ClaimDraft, ctx: &PolicyContext) {
    draft
        .apply(
            DraftUpdate::SetDeclaration {
                terms_agreed: true,
                signature_name: Some("Jordan Smith".to_string()),
            },
            ctx,
        )
        .unwrap();
}

// ============================================================================
// Navigator guard tests
// ============================================================================

mod navigator_tests {
    use super::*;

    #[test]
    fn test_advance_refused_until_policy_selected() {
        let ctx = context();
        let draft = ClaimDraft::new(ClaimType::Breakdown);
        let mut navigator = StageNavigator::new(ClaimType::Breakdown);

        let refused = navigator.advance(&draft, &ctx);
        assert!(matches!(
            refused,
            Err(ClaimError::AdvanceRefused {
                stage: StageId::PolicySelection
            })
        ));
    }

    #[test]
    fn test_retreat_is_always_allowed_and_keeps_state() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Breakdown);
        let mut navigator = StageNavigator::new(ClaimType::Breakdown);

        draft.apply(DraftUpdate::SelectPolicy, &ctx).unwrap();
        navigator.advance(&draft, &ctx).unwrap();
        confirm_device(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();

        assert!(navigator.retreat());
        assert_eq!(
            navigator.current_stage().map(|s| s.id),
            Some(StageId::DeviceConfirmation)
        );
        // Nothing was discarded on the way back.
        assert_eq!(draft.device.model.as_deref(), Some("A2882"));

        assert!(navigator.retreat());
        assert!(!navigator.retreat());
    }

    #[test]
    fn test_device_confirmation_blocks_until_tristate_answered() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Damage);
        let mut navigator = StageNavigator::with_policy_preselected(ClaimType::Damage);
        draft.apply(DraftUpdate::SelectPolicy, &ctx).unwrap();

        let refused = navigator.advance(&draft, &ctx);
        assert!(matches!(
            refused,
            Err(ClaimError::AdvanceRefused {
                stage: StageId::DeviceConfirmation
            })
        ));
    }

    #[test]
    fn test_incorrect_confirmation_requires_full_reentry() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Damage);
        let mut navigator = StageNavigator::with_policy_preselected(ClaimType::Damage);
        draft.apply(DraftUpdate::SelectPolicy, &ctx).unwrap();

        draft
            .apply(DraftUpdate::ConfirmDevice { matches: false }, &ctx)
            .unwrap();
        assert!(navigator.advance(&draft, &ctx).is_err());

        draft
            .apply(
                DraftUpdate::SetDeviceDetails {
                    category: Some("iPhone 14".to_string()),
                    make: Some("Apple".to_string()),
                    model: Some("A2882".to_string()),
                    serial: None,
                    color: Some("midnight".to_string()),
                    purchase_price: Some(rust_decimal::Decimal::new(89900, 2)),
                },
                &ctx,
            )
            .unwrap();
        assert!(navigator.advance(&draft, &ctx).is_ok());
    }
}

// ============================================================================
// Breakdown flow
// ============================================================================

mod breakdown_flow_tests {
    use super::*;

    fn fill_fault(draft: &mut ClaimDraft, ctx: &PolicyContext) {
        draft
            .apply(
                DraftUpdate::SetFaultDetails {
                    category: Some("battery".to_string()),
                    specific_issue: Some("does not hold charge".to_string()),
                    severity: Some(Severity::Moderate),
                },
                ctx,
            )
            .unwrap();
    }

    #[test]
    fn test_breakdown_walkthrough_to_terminal() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Breakdown);
        let mut navigator = StageNavigator::new(ClaimType::Breakdown);

        draft.apply(DraftUpdate::SelectPolicy, &ctx).unwrap();
        navigator.advance(&draft, &ctx).unwrap();

        confirm_device(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();

        fill_fault(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();

        // Fault date well past the 12-month warranty from 2023-02-01.
        draft
            .apply(
                DraftUpdate::SetProblemTiming {
                    first_observed: Some(date(2024, 6, 1)),
                    frequency: Some(domain_claims::FaultFrequency::Constant),
                },
                &ctx,
            )
            .unwrap();
        draft.warranty = Some(warranty::evaluate(
            date(2024, 6, 1),
            Some(date(2023, 2, 1)),
            12,
        ));
        navigator.advance(&draft, &ctx).unwrap();

        draft
            .attach(EvidenceRole::DefectPhoto, "defect.jpg", "image/jpeg", vec![1])
            .unwrap();
        navigator.advance(&draft, &ctx).unwrap();

        // Supporting documents are optional.
        navigator.advance(&draft, &ctx).unwrap();

        sign(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();
        assert!(navigator.is_terminal());

        assert!(matches!(
            navigator.advance(&draft, &ctx),
            Err(ClaimError::AlreadyTerminal)
        ));
    }

    #[test]
    fn test_warranty_advisory_blocks_problem_timing() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Breakdown);
        let mut navigator = StageNavigator::new(ClaimType::Breakdown);

        draft.apply(DraftUpdate::SelectPolicy, &ctx).unwrap();
        navigator.advance(&draft, &ctx).unwrap();
        confirm_device(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();
        fill_fault(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();

        // Fault two months after purchase: inside the 12-month warranty.
        draft
            .apply(
                DraftUpdate::SetProblemTiming {
                    first_observed: Some(date(2023, 4, 1)),
                    frequency: Some(domain_claims::FaultFrequency::Intermittent),
                },
                &ctx,
            )
            .unwrap();
        draft.warranty = Some(warranty::evaluate(
            date(2023, 4, 1),
            Some(date(2023, 2, 1)),
            12,
        ));

        let refused = navigator.advance(&draft, &ctx);
        assert!(matches!(
            refused,
            Err(ClaimError::AdvanceRefused {
                stage: StageId::ProblemTiming
            })
        ));

        draft
            .apply(DraftUpdate::AcknowledgeWarrantyAdvisory, &ctx)
            .unwrap();
        assert!(navigator.advance(&draft, &ctx).is_ok());
    }
}

// ============================================================================
// Damage flow
// ============================================================================

mod damage_flow_tests {
    use super::*;

    fn advance_to_proof_of_ownership(
        draft: &mut ClaimDraft,
        navigator: &mut StageNavigator,
        ctx: &PolicyContext,
    ) {
        draft.apply(DraftUpdate::SelectPolicy, ctx).unwrap();
        navigator.advance(draft, ctx).unwrap();
        confirm_device(draft, ctx);
        navigator.advance(draft, ctx).unwrap();

        draft
            .apply(
                DraftUpdate::SetIncidentDetails {
                    incident_at: Some(Utc.with_ymd_and_hms(2024, 5, 10, 14, 30, 0).unwrap()),
                    description: Some("dropped the phone on a concrete floor".to_string()),
                },
                ctx,
            )
            .unwrap();
        navigator.advance(draft, ctx).unwrap();

        draft
            .apply(
                DraftUpdate::SetDamageAssessment {
                    damage_type: Some("cracked screen".to_string()),
                    affected_area: Some("display".to_string()),
                },
                ctx,
            )
            .unwrap();
        navigator.advance(draft, ctx).unwrap();

        draft
            .attach(EvidenceRole::DamagePhoto, "crack.jpg", "image/jpeg", vec![1])
            .unwrap();
        navigator.advance(draft, ctx).unwrap();
    }

    #[test]
    fn test_damage_short_description_blocks_incident_stage() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Damage);
        let mut navigator = StageNavigator::new(ClaimType::Damage);

        draft.apply(DraftUpdate::SelectPolicy, &ctx).unwrap();
        navigator.advance(&draft, &ctx).unwrap();
        confirm_device(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();

        draft
            .apply(
                DraftUpdate::SetIncidentDetails {
                    incident_at: Some(Utc.with_ymd_and_hms(2024, 5, 10, 14, 30, 0).unwrap()),
                    description: Some("dropped it".to_string()),
                },
                &ctx,
            )
            .unwrap();

        assert!(matches!(
            navigator.advance(&draft, &ctx),
            Err(ClaimError::AdvanceRefused {
                stage: StageId::IncidentDetails
            })
        ));
    }

    #[test]
    fn test_damage_without_ownership_proof_never_reaches_terminal() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Damage);
        let mut navigator = StageNavigator::new(ClaimType::Damage);
        advance_to_proof_of_ownership(&mut draft, &mut navigator, &ctx);

        assert_eq!(
            navigator.current_stage().map(|s| s.id),
            Some(StageId::ProofOfOwnership)
        );
        // Zero proof-of-ownership files: advance is refused.
        let refused = navigator.advance(&draft, &ctx);
        assert!(matches!(
            refused,
            Err(ClaimError::AdvanceRefused {
                stage: StageId::ProofOfOwnership
            })
        ));
        assert!(!navigator.is_terminal());
    }

    #[test]
    fn test_damage_walkthrough_to_terminal() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Damage);
        let mut navigator = StageNavigator::new(ClaimType::Damage);
        advance_to_proof_of_ownership(&mut draft, &mut navigator, &ctx);

        draft
            .attach(
                EvidenceRole::ProofOfOwnership,
                "receipt.pdf",
                "application/pdf",
                vec![1],
            )
            .unwrap();
        navigator.advance(&draft, &ctx).unwrap();
        navigator.advance(&draft, &ctx).unwrap(); // optional supporting docs
        sign(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();
        assert!(navigator.is_terminal());
    }
}

// ============================================================================
// Theft flow
// ============================================================================

mod theft_flow_tests {
    use super::*;

    #[test]
    fn test_theft_police_report_required_only_when_notified() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Theft);
        let mut navigator = StageNavigator::new(ClaimType::Theft);

        draft.apply(DraftUpdate::SelectPolicy, &ctx).unwrap();
        navigator.advance(&draft, &ctx).unwrap();
        confirm_device(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();

        draft
            .apply(
                DraftUpdate::SetTheftCircumstances {
                    incident_description: Some(
                        "stolen from my bag on the evening train home".to_string(),
                    ),
                    recovery_efforts: Some(
                        "retraced the route, contacted the rail operator's lost property \
                         office, and used the find-my-device service"
                            .to_string(),
                    ),
                    police_notified: Some(true),
                },
                &ctx,
            )
            .unwrap();
        navigator.advance(&draft, &ctx).unwrap();

        draft
            .attach(EvidenceRole::ItemPhoto, "item.jpg", "image/jpeg", vec![1])
            .unwrap();
        draft
            .attach(
                EvidenceRole::TheftScenePhoto,
                "scene.png",
                "image/png",
                vec![1],
            )
            .unwrap();
        navigator.advance(&draft, &ctx).unwrap();

        draft
            .attach(
                EvidenceRole::ProofOfOwnership,
                "receipt.pdf",
                "application/pdf",
                vec![1],
            )
            .unwrap();
        // Police notified: documentation stage also demands the report PDF.
        assert!(matches!(
            navigator.advance(&draft, &ctx),
            Err(ClaimError::AdvanceRefused {
                stage: StageId::Documentation
            })
        ));

        draft
            .attach(
                EvidenceRole::PoliceReport,
                "report.pdf",
                "application/pdf",
                vec![1],
            )
            .unwrap();
        navigator.advance(&draft, &ctx).unwrap();

        sign(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();
        assert!(navigator.is_terminal());
    }

    #[test]
    fn test_theft_recovery_efforts_minimum_is_fifty_chars() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Theft);
        let mut navigator = StageNavigator::with_policy_preselected(ClaimType::Theft);
        draft.apply(DraftUpdate::SelectPolicy, &ctx).unwrap();
        confirm_device(&mut draft, &ctx);
        navigator.advance(&draft, &ctx).unwrap();

        draft
            .apply(
                DraftUpdate::SetTheftCircumstances {
                    incident_description: Some("stolen from a locked car overnight".to_string()),
                    recovery_efforts: Some("looked around the car park".to_string()),
                    police_notified: Some(false),
                },
                &ctx,
            )
            .unwrap();

        assert!(matches!(
            navigator.advance(&draft, &ctx),
            Err(ClaimError::AdvanceRefused {
                stage: StageId::TheftCircumstances
            })
        ));
    }
}

// ============================================================================
// Submission-time re-validation
// ============================================================================

mod revalidation_tests {
    use super::*;

    #[test]
    fn test_incomplete_stages_reports_later_edits() {
        let ctx = context();
        let mut draft = ClaimDraft::new(ClaimType::Breakdown);
        let navigator = StageNavigator::new(ClaimType::Breakdown);

        draft.apply(DraftUpdate::SelectPolicy, &ctx).unwrap();
        let incomplete = navigator.incomplete_stages(&draft, &ctx);
        assert!(incomplete.contains(&StageId::DeviceConfirmation));
        assert!(incomplete.contains(&StageId::Declaration));
        assert!(!incomplete.contains(&StageId::PolicySelection));
        assert!(!incomplete.contains(&StageId::SupportingDocuments));
    }
}
