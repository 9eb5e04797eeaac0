//! Intake Application
//!
//! Orchestrates a claim intake session end to end: loads the policy
//! context, gates claim-type selection on the policy's cover, drives the
//! staged collection wizard, optionally enriches the draft from image
//! analysis, and finalizes the submission into a persisted, automatically
//! decided claim.

pub mod config;
pub mod error;
pub mod finalizer;
pub mod ports;
pub mod session;

pub use config::IntakeConfig;
pub use error::{IntakeError, SubmissionError};
pub use ports::{
    AnalysisReport, ClaimRepositoryPort, FileStoragePort, ImageAnalysisPort, IntakePorts,
    NotificationPort,
};
pub use session::IntakeSession;
