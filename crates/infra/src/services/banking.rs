//! Bank account lifecycle and ledger reconstruction.

use std::sync::Arc;

use chrono::{Duration, Utc};

use munim_banking::{
    AccountStats, AccountStatus, BankAccount, BankAccountId, NewBankAccount, compute_stats,
    generate_account_code,
};
use munim_core::{DomainError, TenantId};
use munim_ledger::{LedgerRow, running_ledger};

use crate::store::{MemoryStore, scoped, scoped_iter, scoped_mut};

use super::{ServiceError, ServiceResult};

/// Fields a caller may change on an existing account.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct AccountUpdate {
    pub account_holder: Option<String>,
    pub branch_name: Option<String>,
    pub status: Option<AccountStatus>,
    pub interest_rate: Option<f64>,
}

#[derive(Clone)]
pub struct BankingService {
    store: Arc<MemoryStore>,
}

impl BankingService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    /// Open an account: enum/IFSC validation, duplicate account-number
    /// rejection, generated account code with retry-on-collision.
    pub fn create_account(
        &self,
        tenant_id: TenantId,
        request: NewBankAccount,
    ) -> ServiceResult<BankAccount> {
        request.validate()?;

        self.store.transact(|state| {
            let duplicate = scoped_iter(&state.accounts, tenant_id)
                .any(|a| a.bank_account_no == request.bank_account_no);
            if duplicate {
                return Err(ServiceError::Domain(DomainError::conflict(format!(
                    "account number {} already exists",
                    request.bank_account_no
                ))));
            }

            let now = Utc::now();
            let mut account = request.into_account(tenant_id, now);

            // The time-based suffix can collide within a tenant; nudge the
            // timestamp until the code is unique (bounded).
            let mut attempt = 0;
            while scoped_iter(&state.accounts, tenant_id)
                .any(|a| a.account_code == account.account_code)
            {
                attempt += 1;
                if attempt > 8 {
                    return Err(ServiceError::Domain(DomainError::conflict(
                        "could not generate a unique account code",
                    )));
                }
                account.account_code = generate_account_code(
                    account.bank_name,
                    account.account_type,
                    now + Duration::milliseconds(attempt),
                );
            }

            state.accounts.insert(account.id, account.clone());
            Ok(account)
        })
    }

    pub fn get_account(
        &self,
        tenant_id: TenantId,
        id: &BankAccountId,
    ) -> ServiceResult<BankAccount> {
        self.store
            .read(|state| scoped(&state.accounts, tenant_id, id).cloned())?
            .ok_or_else(ServiceError::not_found)
    }

    pub fn list_accounts(
        &self,
        tenant_id: TenantId,
        status: Option<AccountStatus>,
    ) -> ServiceResult<Vec<BankAccount>> {
        let mut accounts = self.store.read(|state| {
            scoped_iter(&state.accounts, tenant_id)
                .filter(|a| status.is_none_or(|s| a.status == s))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(accounts)
    }

    pub fn update_account(
        &self,
        tenant_id: TenantId,
        id: &BankAccountId,
        update: AccountUpdate,
    ) -> ServiceResult<BankAccount> {
        if let Some(rate) = update.interest_rate
            && rate < 0.0
        {
            return Err(ServiceError::Domain(DomainError::validation(
                "interest rate cannot be negative",
            )));
        }

        self.store.transact(|state| {
            let account = scoped_mut(&mut state.accounts, tenant_id, id)
                .ok_or_else(ServiceError::not_found)?;

            if let Some(rate) = update.interest_rate {
                if rate > 0.0 && !account.account_type.is_interest_bearing() {
                    return Err(ServiceError::Domain(DomainError::validation(
                        "interest rate is only valid for savings/deposit/NRE/NRO accounts",
                    )));
                }
                account.interest_rate = rate;
            }
            if let Some(holder) = update.account_holder {
                account.account_holder = holder;
            }
            if let Some(branch) = update.branch_name {
                account.branch_name = branch;
            }
            if let Some(status) = update.status {
                account.status = status;
            }
            Ok(account.clone())
        })
    }

    /// Soft delete: the account stays, marked inactive.
    pub fn deactivate_account(
        &self,
        tenant_id: TenantId,
        id: &BankAccountId,
    ) -> ServiceResult<BankAccount> {
        self.update_account(
            tenant_id,
            id,
            AccountUpdate {
                status: Some(AccountStatus::Inactive),
                ..AccountUpdate::default()
            },
        )
    }

    /// Hard delete. Historical entries referencing the account remain.
    pub fn delete_account(&self, tenant_id: TenantId, id: &BankAccountId) -> ServiceResult<()> {
        self.store.transact(|state| {
            scoped(&state.accounts, tenant_id, id).ok_or_else(ServiceError::not_found)?;
            state.accounts.remove(id);
            Ok(())
        })
    }

    /// Point-in-time running-balance reconstruction from the entry store.
    pub fn reconstruct_ledger(
        &self,
        tenant_id: TenantId,
        id: &BankAccountId,
    ) -> ServiceResult<Vec<LedgerRow>> {
        let lines = self.store.read(|state| {
            scoped(&state.accounts, tenant_id, id)?;
            Some(
                scoped_iter(&state.entries, tenant_id)
                    .filter(|line| line.bank_account_id == Some(*id))
                    .cloned()
                    .collect::<Vec<_>>(),
            )
        })?;

        match lines {
            Some(lines) => Ok(running_ledger(lines)),
            None => Err(ServiceError::not_found()),
        }
    }

    pub fn stats(&self, tenant_id: TenantId) -> ServiceResult<AccountStats> {
        Ok(self
            .store
            .read(|state| compute_stats(scoped_iter(&state.accounts, tenant_id)))?)
    }
}
