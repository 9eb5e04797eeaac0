//! Policy Domain
//!
//! This crate provides the read-only policy context for a claim intake
//! session: the active policy, its covered peril list, the single insured
//! device, and the eligibility gate that decides which claim types may be
//! filed against the policy.
//!
//! The policy and device records are immutable for the duration of a claim
//! session; they are loaded once through [`ports::PolicyPort`].

pub mod device;
pub mod eligibility;
pub mod policy;
pub mod ports;

pub use device::InsuredDevice;
pub use eligibility::{allowed_claim_types, is_claim_type_allowed, ClaimType};
pub use policy::{Policy, Product, ProductTier};
pub use ports::{PolicyPort, WarrantyPort, DEFAULT_WARRANTY_MONTHS};
