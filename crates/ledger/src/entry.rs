use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use munim_banking::BankAccountId;
use munim_core::{DomainError, DomainResult, Entity, EntryId, Money, TenantId, UserId, define_id};
use munim_projects::ProjectId;
use munim_vendors::VendorId;

define_id!(
    /// Employee identifier (referent only; HR records live outside the core).
    EmployeeId
);

/// Movement direction, from the perspective of the tagged bank account.
///
/// For a bank-scoped entry: credit = inflow (+), debit = outflow (-).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Debit,
    Credit,
}

impl Direction {
    pub fn sign(self) -> i64 {
        match self {
            Direction::Debit => -1,
            Direction::Credit => 1,
        }
    }
}

/// One ledger leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub id: EntryId,
    pub date: DateTime<Utc>,
    pub direction: Direction,
    /// Non-negative magnitude; the sign lives in `direction`.
    pub amount: Money,
    pub debit_account: Option<String>,
    pub credit_account: Option<String>,
    pub bank_account_id: Option<BankAccountId>,
    pub vendor_id: Option<VendorId>,
    pub employee_id: Option<EmployeeId>,
    pub project_id: Option<ProjectId>,
    pub narration: String,
    pub cost_code: Option<String>,
    pub is_approved: bool,
    pub tenant_id: TenantId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl TransactionLine {
    /// Signed amount: positive for inflow (credit), negative for outflow.
    pub fn signed_amount(&self) -> Money {
        self.direction.sign() * self.amount
    }
}

impl Entity for TransactionLine {
    type Id = EntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Validated request to record an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub date: DateTime<Utc>,
    pub direction: Direction,
    pub amount: Money,
    pub debit_account: Option<String>,
    pub credit_account: Option<String>,
    pub bank_account_id: Option<BankAccountId>,
    pub vendor_id: Option<VendorId>,
    pub employee_id: Option<EmployeeId>,
    pub project_id: Option<ProjectId>,
    pub narration: String,
    pub cost_code: Option<String>,
}

impl NewEntry {
    pub fn validate(&self) -> DomainResult<()> {
        if self.amount <= 0 {
            return Err(DomainError::validation(
                "entry amount must be a positive magnitude",
            ));
        }
        if self.bank_account_id.is_none()
            && self.debit_account.is_none()
            && self.credit_account.is_none()
        {
            return Err(DomainError::validation(
                "entry must reference a bank account, debit account, or credit account",
            ));
        }
        Ok(())
    }

    pub fn into_line(
        self,
        tenant_id: TenantId,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> TransactionLine {
        TransactionLine {
            id: EntryId::new(),
            date: self.date,
            direction: self.direction,
            amount: self.amount,
            debit_account: self.debit_account,
            credit_account: self.credit_account,
            bank_account_id: self.bank_account_id,
            vendor_id: self.vendor_id,
            employee_id: self.employee_id,
            project_id: self.project_id,
            narration: self.narration,
            cost_code: self.cost_code,
            is_approved: true,
            tenant_id,
            created_by,
            created_at: now,
        }
    }
}

/// Filter for listing entries. Tenant scoping is applied by the store, not
/// here; the filter narrows within one tenant's entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryFilter {
    pub bank_account_id: Option<BankAccountId>,
    pub vendor_id: Option<VendorId>,
    pub project_id: Option<ProjectId>,
    /// Matches either the debit or the credit account name.
    pub account: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl EntryFilter {
    pub fn matches(&self, line: &TransactionLine) -> bool {
        if let Some(bank) = self.bank_account_id
            && line.bank_account_id != Some(bank)
        {
            return false;
        }
        if let Some(vendor) = self.vendor_id
            && line.vendor_id != Some(vendor)
        {
            return false;
        }
        if let Some(project) = self.project_id
            && line.project_id != Some(project)
        {
            return false;
        }
        if let Some(account) = &self.account
            && line.debit_account.as_deref() != Some(account.as_str())
            && line.credit_account.as_deref() != Some(account.as_str())
        {
            return false;
        }
        if let Some(from) = self.from
            && line.date < from
        {
            return false;
        }
        if let Some(to) = self.to
            && line.date > to
        {
            return false;
        }
        true
    }
}
