//! `munim-vendors` — vendor referents, advances, and the vendor statement.
//!
//! Vendors themselves are read-only referents for bills and advances; payment
//! flows never mutate them. The statement is a pure projection recomputed on
//! every request — there is no cached view to invalidate.

pub mod statement;
pub mod vendor;

pub use statement::{StatementKind, StatementLine, StatementSource, build_statement};
pub use vendor::{AdvanceId, Vendor, VendorAdvance, VendorId};
