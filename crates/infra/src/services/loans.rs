//! Loan lifecycle orchestration over the pure amortization engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use munim_core::{DomainError, Money, TenantId};
use munim_events::{Notification, Notifier};
use munim_loans::{Loan, LoanId, NewLoan};

use crate::store::{MemoryStore, scoped, scoped_iter, scoped_mut};

use super::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct LoanService {
    store: Arc<MemoryStore>,
    notifier: Arc<dyn Notifier>,
}

impl LoanService {
    pub fn new(store: Arc<MemoryStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub fn create_loan(&self, tenant_id: TenantId, request: NewLoan) -> ServiceResult<Loan> {
        request.validate()?;

        self.store.transact(|state| {
            let duplicate = scoped_iter(&state.loans, tenant_id)
                .any(|l| l.loan_number == request.loan_number);
            if duplicate {
                return Err(ServiceError::Domain(DomainError::conflict(format!(
                    "loan number {} already exists",
                    request.loan_number
                ))));
            }

            let loan = request.clone().into_loan(tenant_id, Utc::now());
            state.loans.insert(loan.id, loan.clone());
            Ok(loan)
        })
    }

    pub fn get_loan(&self, tenant_id: TenantId, id: &LoanId) -> ServiceResult<Loan> {
        self.store
            .read(|state| scoped(&state.loans, tenant_id, id).cloned())?
            .ok_or_else(ServiceError::not_found)
    }

    pub fn list_loans(&self, tenant_id: TenantId) -> ServiceResult<Vec<Loan>> {
        let mut loans = self.store.read(|state| {
            scoped_iter(&state.loans, tenant_id)
                .cloned()
                .collect::<Vec<_>>()
        })?;
        loans.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(loans)
    }

    pub fn approve(&self, tenant_id: TenantId, id: &LoanId) -> ServiceResult<Loan> {
        self.store.transact(|state| {
            let loan =
                scoped_mut(&mut state.loans, tenant_id, id).ok_or_else(ServiceError::not_found)?;
            loan.approve()?;
            Ok(loan.clone())
        })
    }

    pub fn disburse(&self, tenant_id: TenantId, id: &LoanId) -> ServiceResult<Loan> {
        self.store.transact(|state| {
            let loan =
                scoped_mut(&mut state.loans, tenant_id, id).ok_or_else(ServiceError::not_found)?;
            loan.disburse(Utc::now())?;
            Ok(loan.clone())
        })
    }

    /// Record a repayment: lateness judged against the due date, balance
    /// decremented, risk re-rated, loan closed at zero.
    pub fn record_payment(
        &self,
        tenant_id: TenantId,
        id: &LoanId,
        amount: Money,
    ) -> ServiceResult<Loan> {
        let loan = self.store.transact::<_, ServiceError>(|state| {
            let loan =
                scoped_mut(&mut state.loans, tenant_id, id).ok_or_else(ServiceError::not_found)?;
            loan.record_payment(amount, Utc::now())?;
            Ok(loan.clone())
        })?;

        self.notifier.emit(Notification::new(
            tenant_id,
            "loans.payment_recorded",
            serde_json::json!({
                "loan_id": loan.id,
                "remaining_balance": loan.remaining_balance,
                "status": loan.status,
                "risk_rating": loan.risk_rating,
            }),
        ));
        Ok(loan)
    }

    /// Loans due (or overdue) soon — the read consumed by the daily
    /// notification job, which lives outside the core.
    pub fn due_for_notification(
        &self,
        tenant_id: TenantId,
        now: DateTime<Utc>,
    ) -> ServiceResult<Vec<Loan>> {
        let mut due = self.store.read(|state| {
            scoped_iter(&state.loans, tenant_id)
                .filter(|l| l.is_due_for_notification(now))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        due.sort_by_key(|l| l.next_payment_due);
        Ok(due)
    }
}
