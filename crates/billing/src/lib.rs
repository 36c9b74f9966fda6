//! `munim-billing` — purchase bill lifecycle.
//!
//! A bill moves `pending → partial → paid`, forward only; `payment_status` is
//! a pure function of the payments sum against the bill amount, re-derived on
//! every mutation rather than stored arithmetic. Each recorded payment is
//! paired (by the service layer) with exactly one ledger entry and one bank
//! balance delta in the same transaction.

pub mod allocation;
pub mod bill;

pub use allocation::{Allocation, allocate_across_bills};
pub use bill::{BillId, BillPayment, PaymentMode, PaymentStatus, PurchaseBill, derive_status};
