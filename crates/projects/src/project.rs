use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use munim_banking::BankAccountId;
use munim_core::{DomainError, DomainResult, Entity, EntryId, Money, TenantId, define_id, money};

define_id!(
    /// Project identifier.
    ProjectId
);

define_id!(
    /// Project payment identifier.
    ProjectPaymentId
);

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
    Cancelled,
}

/// Project document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub client: String,
    pub budget: Money,
    /// Denormalized; always recomputed from the payment collection.
    pub received_amount: Money,
    pub status: ProjectStatus,
    pub tenant_id: TenantId,
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// How a client payment arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Cheque,
    BankTransfer,
    Upi,
}

/// One incoming client payment against a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPayment {
    pub id: ProjectPaymentId,
    pub project_id: ProjectId,
    pub amount: Money,
    pub payment_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<BankAccountId>,
    /// Ledger entry created alongside this payment.
    pub transaction_id: EntryId,
    pub tenant_id: TenantId,
}

impl ProjectPayment {
    pub fn validate(&self) -> DomainResult<()> {
        if self.amount <= 0 {
            return Err(DomainError::validation("payment amount must be positive"));
        }
        if self.payment_method == PaymentMethod::BankTransfer && self.bank_account_id.is_none() {
            return Err(DomainError::validation(
                "bank transfer payments require a bank account",
            ));
        }
        Ok(())
    }
}

impl Entity for ProjectPayment {
    type Id = ProjectPaymentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Full resummation of a project's received amount.
///
/// Idempotent and side-effect-free: safe to rerun on every write (or retry).
/// Payments for other projects in the input are ignored, so callers can pass
/// an unfiltered collection.
pub fn recompute_received<'a, I>(project_id: ProjectId, payments: I) -> Money
where
    I: IntoIterator<Item = &'a ProjectPayment>,
{
    let total = money::sum_amounts(
        payments
            .into_iter()
            .filter(|p| p.project_id == project_id)
            .map(|p| p.amount),
    );
    money::narrow_saturating(total)
}
