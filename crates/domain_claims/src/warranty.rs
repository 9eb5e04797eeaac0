//! Warranty Overlap Evaluator (breakdown claims only)
//!
//! Determines whether a reported fault date falls inside the manufacturer
//! warranty window. A pure function of `(fault_date, purchase_date,
//! warranty_months)`; resolving those inputs (lookup priority, default
//! months) is the caller's concern.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Outcome of the warranty overlap evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarrantyResult {
    /// True when the fault date falls strictly before the warranty end
    pub within_warranty: bool,
    /// The effective purchase date the window was anchored on
    pub purchase_date: Option<NaiveDate>,
    /// Warranty duration in months
    pub warranty_months: u32,
    /// First day outside the warranty window
    pub warranty_end: Option<NaiveDate>,
}

/// Evaluates manufacturer-warranty overlap
///
/// `within_warranty = fault_date < purchase_date + warranty_months`; a
/// fault on the boundary day itself is outside the warranty. With no
/// effective purchase date there is no window and the claim is treated as
/// out of warranty.
pub fn evaluate(
    fault_date: NaiveDate,
    purchase_date: Option<NaiveDate>,
    warranty_months: u32,
) -> WarrantyResult {
    let warranty_end =
        purchase_date.and_then(|purchase| purchase.checked_add_months(Months::new(warranty_months)));

    WarrantyResult {
        within_warranty: warranty_end.is_some_and(|end| fault_date < end),
        purchase_date,
        warranty_months,
        warranty_end,
    }
}
