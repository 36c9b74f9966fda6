//! Running-balance reconstruction.
//!
//! The running balance of a bank account is the cumulative signed sum of its
//! entries ordered by date ascending, ties broken by insertion order. Entry
//! ids are UUIDv7 (time-ordered), so `(date, id)` gives exactly that order.

use serde::{Deserialize, Serialize};

use munim_core::{Money, money};

use crate::entry::TransactionLine;

/// One reconstructed ledger row: the entry plus the balance after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub line: TransactionLine,
    pub running_balance: Money,
}

/// Fold entries into a date-ascending running-balance sequence.
///
/// The caller passes the entries of a single account (already tenant-scoped);
/// input order does not matter.
pub fn running_ledger(mut lines: Vec<TransactionLine>) -> Vec<LedgerRow> {
    lines.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.as_uuid().cmp(b.id.as_uuid())));

    let mut balance: i128 = 0;
    lines
        .into_iter()
        .map(|line| {
            balance += line.signed_amount() as i128;
            LedgerRow {
                running_balance: money::narrow_saturating(balance),
                line,
            }
        })
        .collect()
}
