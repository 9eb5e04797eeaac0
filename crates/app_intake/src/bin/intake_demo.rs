//! Scripted end-to-end intake run against the in-memory adapters
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin intake_demo
//!
//! # With a log level override
//! INTAKE_LOG_LEVEL=debug cargo run --bin intake_demo
//! ```

use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app_intake::ports::mock::{
    MockClaimRepository, MockFileStorage, MockImageAnalysis, MockNotification,
};
use app_intake::{AnalysisReport, IntakeConfig, IntakePorts, IntakeSession};
use core_kernel::{DeviceId, PolicyId};
use domain_claims::{ClaimType, DraftUpdate, EvidenceRole};
use domain_policy::ports::mock::{MockPolicyPort, MockWarrantyPort};
use domain_policy::{InsuredDevice, Policy, Product};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = IntakeConfig::from_env().unwrap_or_default();
    init_tracing(&config.log_level);

    let policy_id = PolicyId::new();
    let policy_port = Arc::new(MockPolicyPort::new());
    policy_port
        .insert_policy(Policy::new(
            policy_id,
            "P-220044",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            Product::new(
                "Device Cover Max",
                "max",
                vec!["Worldwide cover".to_string()],
                vec![
                    "Mechanical Breakdown".to_string(),
                    "Accidental Damage".to_string(),
                    "Theft".to_string(),
                ],
            ),
        ))
        .await;
    policy_port
        .insert_device(
            policy_id,
            InsuredDevice {
                id: DeviceId::new(),
                product_name: "iPhone 14".to_string(),
                model: "A2882".to_string(),
                serial_number: Some("F2LXK7PQ0D".to_string()),
                purchase_price: None,
                purchase_date: NaiveDate::from_ymd_opt(2023, 2, 1),
                added_date: None,
            },
        )
        .await;

    let warranty_port = Arc::new(MockWarrantyPort::new());
    warranty_port.insert_category("iPhone 14", 12).await;

    let analysis = Arc::new(MockImageAnalysis::new());
    analysis
        .set_report(AnalysisReport {
            device_category: Some("iPhone 14".to_string()),
            brand: Some("Apple".to_string()),
            color: Some("midnight".to_string()),
            damage_observations: vec!["cracked display glass".to_string()],
            explanation: Some("screen damage consistent with a drop".to_string()),
            ..AnalysisReport::default()
        })
        .await;

    let repository = Arc::new(MockClaimRepository::new());
    let ports = IntakePorts {
        policy: policy_port,
        warranty: warranty_port,
        storage: Arc::new(MockFileStorage::new()),
        repository: repository.clone(),
        notification: Arc::new(MockNotification::new()),
        analysis,
    };

    let mut session = IntakeSession::start(policy_id, ports, config).await?;
    tracing::info!(types = ?session.selectable_claim_types(), "claim types available");
    session.select_claim_type(ClaimType::Damage)?;

    // Device confirmation, with analysis hints filling the gaps.
    session
        .apply(DraftUpdate::ConfirmDevice { matches: true })
        .await?;
    session.attach(
        EvidenceRole::DamagePhoto,
        "cracked-screen.jpg",
        "image/jpeg",
        vec![0xFF, 0xD8, 0xFF],
    )?;
    session.enrich_from_analysis().await?;
    session.advance()?;

    session
        .apply(DraftUpdate::SetIncidentDetails {
            incident_at: Some(Utc::now()),
            description: Some("dropped the phone on a concrete floor outside".to_string()),
        })
        .await?;
    session.advance()?;

    session
        .apply(DraftUpdate::SetDamageAssessment {
            damage_type: Some("cracked screen".to_string()),
            affected_area: Some("display".to_string()),
        })
        .await?;
    session.advance()?;

    // Damage photo already attached.
    session.advance()?;

    session.attach(
        EvidenceRole::ProofOfOwnership,
        "receipt.pdf",
        "application/pdf",
        vec![0x25, 0x50, 0x44, 0x46],
    )?;
    session.advance()?;

    // No supporting documents.
    session.advance()?;

    session
        .apply(DraftUpdate::SetDeclaration {
            terms_agreed: true,
            signature_name: Some("Jordan Smith".to_string()),
        })
        .await?;
    session.advance()?;

    let record = session.submit().await?;
    tracing::info!(
        claim_number = %record.claim_number,
        status = %record.status,
        reason = %record.decision.reason,
        documents = repository.documents_for(record.id).await.len(),
        "intake complete"
    );
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
