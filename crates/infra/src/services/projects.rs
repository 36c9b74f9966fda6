//! Project receivables: transactional payment recording and deletion with
//! full resummation of the denormalized `received_amount`.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use munim_banking::BankAccountId;
use munim_core::{DomainError, Money, TenantId, UserId};
use munim_events::{Notification, Notifier};
use munim_ledger::{Direction, NewEntry};
use munim_projects::{
    PaymentMethod, Project, ProjectId, ProjectPayment, ProjectPaymentId, ProjectStatus,
    recompute_received,
};

use crate::store::{MemoryStore, State, scoped, scoped_iter, scoped_mut};

use super::{ServiceError, ServiceResult, apply_to_balance};

/// Synthetic credit account for incoming project money. Not a real account
/// document; a fixed label on the ledger entry.
const PROJECT_INCOME_ACCOUNT: &str = "income:project";

/// Request to create a project.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewProject {
    pub name: String,
    pub client: String,
    pub budget: Money,
}

/// Request to record an incoming client payment.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RecordProjectPayment {
    pub amount: Money,
    pub payment_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<BankAccountId>,
}

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<MemoryStore>,
    notifier: Arc<dyn Notifier>,
}

impl ProjectService {
    pub fn new(store: Arc<MemoryStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub fn create_project(&self, tenant_id: TenantId, request: NewProject) -> ServiceResult<Project> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::Domain(DomainError::validation(
                "project name is required",
            )));
        }
        if request.budget < 0 {
            return Err(ServiceError::Domain(DomainError::validation(
                "budget cannot be negative",
            )));
        }

        self.store.transact(|state| {
            let project = Project {
                id: ProjectId::new(),
                name: request.name.clone(),
                client: request.client.clone(),
                budget: request.budget,
                received_amount: 0,
                status: ProjectStatus::Active,
                tenant_id,
            };
            state.projects.insert(project.id, project.clone());
            Ok(project)
        })
    }

    pub fn get_project(&self, tenant_id: TenantId, id: &ProjectId) -> ServiceResult<Project> {
        self.store
            .read(|state| scoped(&state.projects, tenant_id, id).cloned())?
            .ok_or_else(ServiceError::not_found)
    }

    pub fn list_payments(
        &self,
        tenant_id: TenantId,
        project_id: &ProjectId,
    ) -> ServiceResult<Vec<ProjectPayment>> {
        let mut payments = self.store.read(|state| {
            scoped_iter(&state.project_payments, tenant_id)
                .filter(|p| p.project_id == *project_id)
                .cloned()
                .collect::<Vec<_>>()
        })?;
        payments.sort_by(|a, b| a.payment_date.cmp(&b.payment_date));
        Ok(payments)
    }

    /// Record an incoming payment: payment doc + ledger entry + optional bank
    /// balance increment + resummed `received_amount`, in one transaction.
    pub fn record_payment(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        project_id: &ProjectId,
        request: RecordProjectPayment,
    ) -> ServiceResult<ProjectPayment> {
        let payment = self.store.transact::<_, ServiceError>(|state| {
            scoped(&state.projects, tenant_id, project_id).ok_or_else(ServiceError::not_found)?;

            // Inflow to the bank, credited against the synthetic income
            // account.
            let debit_account = match request.bank_account_id {
                Some(account_id) => Some(
                    scoped(&state.accounts, tenant_id, &account_id)
                        .map(|a| a.account_code.clone())
                        .ok_or_else(ServiceError::not_found)?,
                ),
                None => Some("cash".to_string()),
            };

            let entry = NewEntry {
                date: request.payment_date,
                direction: Direction::Credit,
                amount: request.amount,
                debit_account,
                credit_account: Some(PROJECT_INCOME_ACCOUNT.to_string()),
                bank_account_id: request.bank_account_id,
                vendor_id: None,
                employee_id: None,
                project_id: Some(*project_id),
                narration: "Project payment received".to_string(),
                cost_code: None,
            };
            entry.validate()?;
            let line = entry.into_line(tenant_id, user_id, Utc::now());

            let payment = ProjectPayment {
                id: ProjectPaymentId::new(),
                project_id: *project_id,
                amount: request.amount,
                payment_date: request.payment_date,
                payment_method: request.payment_method,
                bank_account_id: request.bank_account_id,
                transaction_id: line.id,
                tenant_id,
            };
            payment.validate()?;

            // The entry is bank-scoped exactly when the balance delta is
            // applied, whatever the payment method; otherwise the signed sum
            // of the account's entries would drift from `current_balance`.
            if let Some(account_id) = request.bank_account_id {
                apply_to_balance(state, tenant_id, &account_id, line.signed_amount())?;
            }

            state.entries.insert(line.id, line);
            state.project_payments.insert(payment.id, payment.clone());
            resum_project(state, tenant_id, project_id)?;
            Ok(payment)
        })?;

        self.notifier.emit(Notification::new(
            tenant_id,
            "projects.payment_recorded",
            serde_json::json!({
                "project_id": project_id,
                "payment_id": payment.id,
                "amount": payment.amount,
            }),
        ));
        Ok(payment)
    }

    /// Symmetric reversal: delete the payment and its ledger entry, reverse
    /// the bank delta, resum the receivable — all transactionally.
    pub fn delete_payment(
        &self,
        tenant_id: TenantId,
        payment_id: &ProjectPaymentId,
    ) -> ServiceResult<()> {
        let project_id = self.store.transact::<_, ServiceError>(|state| {
            let payment = scoped(&state.project_payments, tenant_id, payment_id)
                .cloned()
                .ok_or_else(ServiceError::not_found)?;

            if let Some(line) = scoped(&state.entries, tenant_id, &payment.transaction_id).cloned()
            {
                if let Some(account_id) = payment.bank_account_id {
                    apply_to_balance(state, tenant_id, &account_id, -line.signed_amount())?;
                }
                state.entries.remove(&line.id);
            }

            state.project_payments.remove(payment_id);
            resum_project(state, tenant_id, &payment.project_id)?;
            Ok(payment.project_id)
        })?;

        self.notifier.emit(Notification::new(
            tenant_id,
            "projects.payment_deleted",
            serde_json::json!({
                "project_id": project_id,
                "payment_id": payment_id,
            }),
        ));
        Ok(())
    }
}

/// Recompute `received_amount` from the full payment collection. Idempotent.
fn resum_project(
    state: &mut State,
    tenant_id: TenantId,
    project_id: &ProjectId,
) -> ServiceResult<()> {
    let received = recompute_received(
        *project_id,
        scoped_iter(&state.project_payments, tenant_id),
    );
    let project = scoped_mut(&mut state.projects, tenant_id, project_id)
        .ok_or_else(ServiceError::not_found)?;
    project.received_amount = received;
    Ok(())
}
