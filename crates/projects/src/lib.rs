//! `munim-projects` — project receivables.
//!
//! `Project.received_amount` is denormalized but never incrementally trusted:
//! after every committed payment or deletion it is recomputed as the full sum
//! over the project's payments. Resummation is the correctness mechanism —
//! it is self-healing against missed or duplicated events, at O(n) read cost
//! per write (fine at small per-project payment counts).

pub mod project;

pub use project::{
    PaymentMethod, Project, ProjectId, ProjectPayment, ProjectPaymentId, ProjectStatus,
    recompute_received,
};
