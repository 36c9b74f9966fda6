//! `munim-ledger` — the ledger entry store's domain types.
//!
//! A [`TransactionLine`] is one recorded money movement: the single source of
//! truth every balance is derived from. Direction is an **explicit stored
//! attribute** (`Direction::Debit`/`Direction::Credit`), never inferred from
//! the presence of an unrelated foreign key.

pub mod balance;
pub mod entry;

pub use balance::{LedgerRow, running_ledger};
pub use entry::{Direction, EmployeeId, EntryFilter, NewEntry, TransactionLine};
