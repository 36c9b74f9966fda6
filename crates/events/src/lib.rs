//! `munim-events` — notification contract for the ledger core.
//!
//! Money-moving operations announce themselves ("bill uploaded", "payment
//! recorded") to an external notifier. The contract is deliberately
//! fire-and-forget: the core never blocks on, retries, or fails because of a
//! notification. The notifier is an **injected capability** passed into each
//! service, never a process-wide singleton, so tests can substitute a no-op
//! or a recording implementation.

pub mod notifier;

pub use notifier::{Notification, Notifier, NoopNotifier, RecordingNotifier};
