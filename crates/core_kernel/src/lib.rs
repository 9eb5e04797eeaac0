//! Core Kernel - Foundational types for the claim intake system
//!
//! This crate provides the fundamental building blocks used across all domain
//! modules:
//! - Strongly-typed identifiers
//! - Port abstractions for external collaborators

pub mod identifiers;
pub mod ports;

pub use identifiers::{ClaimId, DeviceId, DocumentId, PolicyId, SessionId};
pub use ports::{DomainPort, OperationMetadata, PortError};
