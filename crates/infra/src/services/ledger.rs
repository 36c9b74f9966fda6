//! Ledger entry store operations.

use std::sync::Arc;

use chrono::Utc;

use munim_core::{EntryId, TenantId, UserId};
use munim_ledger::{EntryFilter, NewEntry, TransactionLine};

use crate::store::{MemoryStore, scoped, scoped_iter};

use super::{ServiceError, ServiceResult, apply_to_balance};

/// Append-only record of money movements; the single source of truth that
/// balances are derived from.
#[derive(Clone)]
pub struct LedgerService {
    store: Arc<MemoryStore>,
}

impl LedgerService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Record one entry. When the entry is bank-scoped, the account's balance
    /// delta lands in the same transaction — both or neither.
    pub fn record_entry(
        &self,
        tenant_id: TenantId,
        created_by: UserId,
        entry: NewEntry,
    ) -> ServiceResult<TransactionLine> {
        entry.validate()?;

        self.store.transact(|state| {
            let line = entry.into_line(tenant_id, created_by, Utc::now());

            if let Some(account_id) = line.bank_account_id {
                apply_to_balance(state, tenant_id, &account_id, line.signed_amount())?;
            }

            state.entries.insert(line.id, line.clone());
            Ok(line)
        })
    }

    /// List entries, newest first.
    pub fn list_entries(
        &self,
        tenant_id: TenantId,
        filter: &EntryFilter,
    ) -> ServiceResult<Vec<TransactionLine>> {
        let mut lines = self.store.read(|state| {
            scoped_iter(&state.entries, tenant_id)
                .filter(|line| filter.matches(line))
                .cloned()
                .collect::<Vec<_>>()
        })?;

        lines.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then(b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(lines)
    }

    pub fn get_entry(&self, tenant_id: TenantId, id: &EntryId) -> ServiceResult<TransactionLine> {
        self.store
            .read(|state| scoped(&state.entries, tenant_id, id).cloned())?
            .ok_or_else(ServiceError::not_found)
    }

    /// Delete an entry together with its compensating balance adjustment.
    ///
    /// Deleting without the compensation is exactly the bug class the store
    /// transaction guards against: both writes commit, or neither does.
    pub fn delete_entry(&self, tenant_id: TenantId, id: &EntryId) -> ServiceResult<()> {
        self.store.transact(|state| {
            let line = scoped(&state.entries, tenant_id, id)
                .cloned()
                .ok_or_else(ServiceError::not_found)?;

            if let Some(account_id) = line.bank_account_id {
                // Reverse what the entry originally applied. The account may
                // have been hard-deleted since; its entries outlive it.
                if scoped(&state.accounts, tenant_id, &account_id).is_some() {
                    apply_to_balance(state, tenant_id, &account_id, -line.signed_amount())?;
                }
            }

            state.entries.remove(id);
            Ok(())
        })
    }
}
