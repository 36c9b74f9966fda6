//! `munim-loans` — loan amortization engine and lifecycle types.
//!
//! The calculation half ([`emi`], [`risk`]) is pure functions with no I/O or
//! persistence coupling. The lifecycle half ([`loan`]) advances strictly
//! forward through statuses and recomputes the risk rating after every
//! recorded payment.

pub mod emi;
pub mod loan;
pub mod risk;

pub use emi::{InstallmentStatus, ScheduleRow, calculate_emi, calculate_schedule};
pub use loan::{Loan, LoanId, LoanPayment, LoanStatus, NewLoan};
pub use risk::{RiskFactors, RiskRating, calculate_risk_rating};
