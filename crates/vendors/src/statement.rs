//! Vendor statement: a chronological merge of bills, advances, and bill
//! payments with a running balance.
//!
//! Sign convention (see DESIGN.md): bills are
//! credits, advances and bill payments are debits, and the running balance is
//! `balance += debit - credit`. A positive balance therefore means the vendor
//! owes us; a negative balance means we owe the vendor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use munim_core::Money;

/// What a statement row originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Purchase bill raised against us (credit).
    Bill,
    /// Advance paid to the vendor (debit).
    Advance,
    /// Payment against a bill (debit).
    BillPayment,
}

impl StatementKind {
    pub fn is_debit(self) -> bool {
        matches!(self, StatementKind::Advance | StatementKind::BillPayment)
    }
}

/// One raw event feeding the statement, before folding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSource {
    pub date: DateTime<Utc>,
    pub kind: StatementKind,
    /// Magnitude; the kind decides the side it lands on.
    pub amount: Money,
    /// Human-readable reference (bill number, narration, ...).
    pub reference: String,
}

/// One folded statement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub date: DateTime<Utc>,
    pub kind: StatementKind,
    pub reference: String,
    pub debit: Money,
    pub credit: Money,
    /// Running `balance += debit - credit` up to and including this row.
    pub balance: Money,
}

/// Fold sources into a date-ascending statement with running balance.
///
/// The sort is stable, so same-date rows keep their supplied order.
pub fn build_statement(mut sources: Vec<StatementSource>) -> Vec<StatementLine> {
    sources.sort_by_key(|s| s.date);

    let mut balance: i128 = 0;
    sources
        .into_iter()
        .map(|source| {
            let (debit, credit) = if source.kind.is_debit() {
                (source.amount, 0)
            } else {
                (0, source.amount)
            };
            balance += debit as i128 - credit as i128;
            StatementLine {
                date: source.date,
                kind: source.kind,
                reference: source.reference,
                debit,
                credit,
                balance: munim_core::money::narrow_saturating(balance),
            }
        })
        .collect()
}
