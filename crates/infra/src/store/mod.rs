//! In-memory, tenant-scoped, transactional document store.
//!
//! Every document carries its `TenantId`; the scoped accessors below return
//! `None` both when a document is absent and when it belongs to another
//! tenant — callers cannot distinguish the two, which is the tenant-isolation
//! contract.
//!
//! Writes go through [`MemoryStore::transact`]: the closure mutates a staged
//! copy of the state, and only a closure that returns `Ok` gets its copy
//! swapped in. Any `Err` (or early `?` return) leaves the store untouched, so
//! compound writes — ledger entry + balance delta, payment + resummation —
//! are all-or-nothing on every exit path. The write lock serializes writers,
//! which also removes the balance read-modify-write race between concurrent
//! requests.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use munim_banking::{BankAccount, BankAccountId};
use munim_billing::{BillId, PurchaseBill};
use munim_core::{Entity, EntryId, TenantId};
use munim_ledger::TransactionLine;
use munim_loans::{Loan, LoanId};
use munim_projects::{Project, ProjectId, ProjectPayment, ProjectPaymentId};
use munim_vendors::{AdvanceId, Vendor, VendorAdvance, VendorId};

/// Store-level failure (infrastructure, not domain).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// The full document state: one map per collection.
#[derive(Debug, Default, Clone)]
pub struct State {
    pub entries: HashMap<EntryId, TransactionLine>,
    pub accounts: HashMap<BankAccountId, BankAccount>,
    pub vendors: HashMap<VendorId, Vendor>,
    pub advances: HashMap<AdvanceId, VendorAdvance>,
    pub bills: HashMap<BillId, PurchaseBill>,
    pub projects: HashMap<ProjectId, Project>,
    pub project_payments: HashMap<ProjectPaymentId, ProjectPayment>,
    pub loans: HashMap<LoanId, Loan>,
}

/// Fetch a document scoped to a tenant.
///
/// Wrong-tenant lookups are indistinguishable from absent documents.
pub fn scoped<'a, T>(map: &'a HashMap<T::Id, T>, tenant_id: TenantId, id: &T::Id) -> Option<&'a T>
where
    T: Entity,
{
    map.get(id).filter(|doc| doc.tenant_id() == tenant_id)
}

/// Mutable variant of [`scoped`].
pub fn scoped_mut<'a, T>(
    map: &'a mut HashMap<T::Id, T>,
    tenant_id: TenantId,
    id: &T::Id,
) -> Option<&'a mut T>
where
    T: Entity,
{
    map.get_mut(id).filter(|doc| doc.tenant_id() == tenant_id)
}

/// Iterate a collection scoped to a tenant.
pub fn scoped_iter<T>(
    map: &HashMap<T::Id, T>,
    tenant_id: TenantId,
) -> impl Iterator<Item = &T> + '_
where
    T: Entity,
{
    map.values().filter(move |doc| doc.tenant_id() == tenant_id)
}

/// In-memory document store.
///
/// Intended for tests/dev and the default wiring. Not optimized for
/// performance: `transact` clones the whole state to stage a write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only closure against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&State) -> R) -> Result<R, StoreError> {
        let guard = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(f(&guard))
    }

    /// Run a closure against a staged copy of the state; commit on `Ok`,
    /// abort on `Err`.
    ///
    /// The staged copy is swapped in only after the closure returns `Ok`, so
    /// every exit path — including `?` propagation from any step — leaves the
    /// store either fully updated or exactly as it was.
    pub fn transact<R, E>(&self, f: impl FnOnce(&mut State) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut staged = guard.clone();
        let result = f(&mut staged)?;
        *guard = staged;
        Ok(result)
    }
}
