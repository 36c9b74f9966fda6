//! Read-side aggregation over a tenant's bank accounts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use munim_core::money;

use crate::account::{AccountStatus, BankAccount};

/// Aggregate statistics for a set of accounts (one tenant's).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccountStats {
    pub total_accounts: usize,
    pub active_accounts: usize,
    /// Sum of `current_balance` across all accounts, saturating.
    pub total_balance: i64,
    pub by_status: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub by_bank: BTreeMap<String, usize>,
}

/// Pure fold; no ordering requirements on the input.
pub fn compute_stats<'a, I>(accounts: I) -> AccountStats
where
    I: IntoIterator<Item = &'a BankAccount>,
{
    let mut stats = AccountStats::default();
    let mut total: i128 = 0;

    for account in accounts {
        stats.total_accounts += 1;
        if account.status == AccountStatus::Active {
            stats.active_accounts += 1;
        }
        total += account.current_balance as i128;

        *stats
            .by_status
            .entry(format!("{:?}", account.status).to_lowercase())
            .or_default() += 1;
        *stats
            .by_type
            .entry(account.account_type.code().to_lowercase())
            .or_default() += 1;
        *stats
            .by_bank
            .entry(account.bank_name.code().to_lowercase())
            .or_default() += 1;
    }

    stats.total_balance = money::narrow_saturating(total);
    stats
}
