//! Application services: one per domain area.
//!
//! Services own the orchestration the domain crates deliberately avoid:
//! resolving tenant-scoped documents, compound transactional writes (ledger
//! entry + balance delta, payment + resummation), and fire-and-forget
//! notifications. Every mutating operation either fully succeeds or fully
//! fails — there is no "succeeded with warnings" outcome for money movement,
//! and no automatic retries anywhere.

use thiserror::Error;

use munim_banking::BankAccountId;
use munim_core::{DomainError, Money, TenantId};

use crate::collaborators::FileStorageError;
use crate::store::{State, StoreError, scoped_mut};

pub mod banking;
pub mod billing;
pub mod ledger;
pub mod loans;
pub mod projects;
pub mod vendors;

pub use banking::BankingService;
pub use billing::BillingService;
pub use ledger::LedgerService;
pub use loans::LoanService;
pub use projects::ProjectService;
pub use vendors::VendorService;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced by services: domain failures pass through, infrastructure
/// failures are wrapped.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("file storage: {0}")]
    FileStorage(#[from] FileStorageError),
}

impl ServiceError {
    pub fn not_found() -> Self {
        Self::Domain(DomainError::NotFound)
    }
}

/// Apply a signed delta to a bank account's denormalized balance.
///
/// Called only from inside a transaction, in the same unit of work as the
/// entry write it mirrors. The account must exist in the caller's tenant.
pub(crate) fn apply_to_balance(
    state: &mut State,
    tenant_id: TenantId,
    account_id: &BankAccountId,
    signed_amount: Money,
) -> ServiceResult<()> {
    let account = scoped_mut(&mut state.accounts, tenant_id, account_id)
        .ok_or_else(ServiceError::not_found)?;
    account.current_balance = account.current_balance.saturating_add(signed_amount);
    Ok(())
}
