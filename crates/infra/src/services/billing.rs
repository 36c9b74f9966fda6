//! Purchase bill lifecycle: upload, payment, lump-sum vendor payments, CRUD.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use munim_billing::{
    BillId, BillPayment, PaymentMode, PurchaseBill, allocate_across_bills,
};
use munim_banking::BankAccountId;
use munim_core::{DomainError, Money, TenantId, UserId};
use munim_events::{Notification, Notifier};
use munim_ledger::{Direction, NewEntry, TransactionLine};
use munim_projects::ProjectId;
use munim_vendors::{VendorAdvance, VendorId};

use crate::collaborators::FileStorage;
use crate::store::{MemoryStore, State, scoped, scoped_iter, scoped_mut};

use super::{ServiceError, ServiceResult, apply_to_balance};

/// File attached to a bill upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub buffer: Vec<u8>,
    pub filename: String,
    pub mimetype: String,
}

/// Request to upload a bill.
#[derive(Debug, Clone)]
pub struct UploadBill {
    pub vendor_id: VendorId,
    pub bill_no: String,
    pub bill_date: DateTime<Utc>,
    pub amount: Money,
    pub project_id: Option<ProjectId>,
    pub file: Option<FileUpload>,
}

/// Request to pay one bill.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PayBill {
    pub bank_account_id: BankAccountId,
    pub payment_mode: PaymentMode,
    /// Defaults to the bill's outstanding amount.
    pub amount: Option<Money>,
    pub narration: Option<String>,
    pub vendor_bank_account: Option<String>,
}

/// What a lump-sum vendor payment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorPaymentKind {
    Advance,
    Bill,
}

/// Request for a lump-sum vendor payment.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct VendorPayment {
    pub vendor_id: VendorId,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub kind: VendorPaymentKind,
    /// Bills to settle, in payment order (`kind = bill` only).
    #[serde(default)]
    pub bill_ids: Vec<BillId>,
    pub bank_account_id: Option<BankAccountId>,
    pub payment_mode: Option<PaymentMode>,
}

/// Fields a caller may change on an existing bill.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct BillUpdate {
    pub bill_no: Option<String>,
    pub bill_date: Option<DateTime<Utc>>,
    pub amount: Option<Money>,
    pub project_id: Option<ProjectId>,
}

#[derive(Clone)]
pub struct BillingService {
    store: Arc<MemoryStore>,
    files: Arc<dyn FileStorage>,
    notifier: Arc<dyn Notifier>,
}

impl BillingService {
    pub fn new(
        store: Arc<MemoryStore>,
        files: Arc<dyn FileStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            files,
            notifier,
        }
    }

    /// Upload a bill. The file goes to storage first: an upload failure
    /// propagates before any bill record exists.
    pub fn upload_bill(&self, tenant_id: TenantId, request: UploadBill) -> ServiceResult<PurchaseBill> {
        let file_url = match &request.file {
            Some(file) => Some(self.files.upload_file(
                &file.buffer,
                &file.filename,
                &file.mimetype,
            )?),
            None => None,
        };

        let bill = self.store.transact::<_, ServiceError>(|state| {
            scoped(&state.vendors, tenant_id, &request.vendor_id)
                .ok_or_else(ServiceError::not_found)?;

            let bill = PurchaseBill::new(
                request.vendor_id,
                request.bill_no.clone(),
                request.bill_date,
                request.amount,
                request.project_id,
                file_url.clone(),
                tenant_id,
                Utc::now(),
            )?;
            state.bills.insert(bill.id, bill.clone());
            Ok(bill)
        })?;

        self.notifier.emit(Notification::new(
            tenant_id,
            "billing.bill_uploaded",
            serde_json::json!({
                "bill_id": bill.id,
                "bill_no": bill.bill_no,
                "amount": bill.amount,
            }),
        ));
        Ok(bill)
    }

    /// Pay a single bill: one atomic unit covering the ledger entry, the
    /// payment push, the status re-derivation, and the bank balance delta.
    pub fn pay_bill(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        bill_id: &BillId,
        request: PayBill,
    ) -> ServiceResult<PurchaseBill> {
        let bill = self.store.transact(|state| {
            let bill = scoped(&state.bills, tenant_id, bill_id)
                .cloned()
                .ok_or_else(ServiceError::not_found)?;

            if bill.is_paid {
                return Err(ServiceError::Domain(DomainError::invariant(
                    "bill is already fully paid",
                )));
            }

            let amount = request.amount.unwrap_or_else(|| bill.outstanding());
            let narration = request
                .narration
                .clone()
                .unwrap_or_else(|| format!("Payment for bill {}", bill.bill_no));

            let line = settle_bill(
                state,
                tenant_id,
                user_id,
                bill_id,
                amount,
                request.payment_mode,
                &request.bank_account_id,
                request.vendor_bank_account.clone(),
                narration,
                Utc::now(),
            )?;

            let mut updated = scoped(&state.bills, tenant_id, bill_id)
                .cloned()
                .ok_or_else(ServiceError::not_found)?;
            updated.related_txn_id = Some(line.id);
            state.bills.insert(updated.id, updated.clone());
            Ok(updated)
        })?;

        self.notifier.emit(Notification::new(
            tenant_id,
            "billing.bill_paid",
            serde_json::json!({
                "bill_id": bill.id,
                "payment_status": bill.payment_status,
                "paid_sum": bill.paid_sum(),
            }),
        ));
        Ok(bill)
    }

    /// Lump-sum vendor payment: an advance, or a greedy settlement across the
    /// supplied bills. All settlements commit in one transaction.
    pub fn create_vendor_payment(
        &self,
        tenant_id: TenantId,
        user_id: UserId,
        request: VendorPayment,
    ) -> ServiceResult<VendorPaymentOutcome> {
        if request.amount <= 0 {
            return Err(ServiceError::Domain(DomainError::validation(
                "payment amount must be positive",
            )));
        }

        let outcome = match request.kind {
            VendorPaymentKind::Advance => self.store.transact::<_, ServiceError>(|state| {
                scoped(&state.vendors, tenant_id, &request.vendor_id)
                    .ok_or_else(ServiceError::not_found)?;

                let advance = VendorAdvance::new(
                    request.vendor_id,
                    request.amount,
                    request.date,
                    tenant_id,
                )?;
                state.advances.insert(advance.id, advance.clone());
                Ok(VendorPaymentOutcome {
                    advance: Some(advance),
                    bills_paid: Vec::new(),
                    leftover: 0,
                })
            })?,
            VendorPaymentKind::Bill => {
                let bank_account_id = request.bank_account_id.ok_or_else(|| {
                    DomainError::validation("bill settlement requires a bank account")
                })?;
                let payment_mode = request.payment_mode.ok_or_else(|| {
                    DomainError::validation("bill settlement requires a payment mode")
                })?;

                self.store.transact::<_, ServiceError>(|state| {
                    scoped(&state.vendors, tenant_id, &request.vendor_id)
                        .ok_or_else(ServiceError::not_found)?;

                    let bills: Vec<PurchaseBill> = request
                        .bill_ids
                        .iter()
                        .map(|id| {
                            scoped(&state.bills, tenant_id, id)
                                .cloned()
                                .ok_or_else(ServiceError::not_found)
                        })
                        .collect::<ServiceResult<_>>()?;

                    let refs: Vec<&PurchaseBill> = bills.iter().collect();
                    let (allocations, leftover) = allocate_across_bills(request.amount, &refs);

                    let mut bills_paid = Vec::with_capacity(allocations.len());
                    for allocation in &allocations {
                        let bill = scoped(&state.bills, tenant_id, &allocation.bill_id)
                            .cloned()
                            .ok_or_else(ServiceError::not_found)?;
                        settle_bill(
                            state,
                            tenant_id,
                            user_id,
                            &allocation.bill_id,
                            allocation.amount,
                            payment_mode,
                            &bank_account_id,
                            None,
                            format!("Vendor payment against bill {}", bill.bill_no),
                            request.date,
                        )?;
                        bills_paid.push(allocation.bill_id);
                    }

                    Ok(VendorPaymentOutcome {
                        advance: None,
                        bills_paid,
                        leftover,
                    })
                })?
            }
        };

        if outcome.leftover > 0 {
            // The residual is dropped without a record. Logged so it is at
            // least observable; see DESIGN.md.
            tracing::warn!(
                leftover = outcome.leftover,
                vendor_id = %request.vendor_id,
                "vendor payment leftover dropped after bill list was exhausted"
            );
        }

        self.notifier.emit(Notification::new(
            tenant_id,
            "billing.vendor_payment_recorded",
            serde_json::json!({
                "vendor_id": request.vendor_id,
                "amount": request.amount,
                "bills_paid": outcome.bills_paid.len(),
                "leftover": outcome.leftover,
            }),
        ));
        Ok(outcome)
    }

    pub fn get_bill(&self, tenant_id: TenantId, id: &BillId) -> ServiceResult<PurchaseBill> {
        self.store
            .read(|state| scoped(&state.bills, tenant_id, id).cloned())?
            .ok_or_else(ServiceError::not_found)
    }

    pub fn list_bills(
        &self,
        tenant_id: TenantId,
        vendor_id: Option<VendorId>,
    ) -> ServiceResult<Vec<PurchaseBill>> {
        let mut bills = self.store.read(|state| {
            scoped_iter(&state.bills, tenant_id)
                .filter(|b| vendor_id.is_none_or(|v| b.vendor_id == v))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        bills.sort_by(|a, b| b.bill_date.cmp(&a.bill_date));
        Ok(bills)
    }

    /// Update bill fields. An amount change re-derives the status; existing
    /// payments above the new amount clamp it at paid rather than failing.
    pub fn update_bill(
        &self,
        tenant_id: TenantId,
        id: &BillId,
        update: BillUpdate,
    ) -> ServiceResult<PurchaseBill> {
        self.store.transact(|state| {
            let bill =
                scoped_mut(&mut state.bills, tenant_id, id).ok_or_else(ServiceError::not_found)?;

            if let Some(bill_no) = update.bill_no {
                if bill_no.trim().is_empty() {
                    return Err(ServiceError::Domain(DomainError::validation(
                        "bill number is required",
                    )));
                }
                bill.bill_no = bill_no;
            }
            if let Some(date) = update.bill_date {
                bill.bill_date = date;
            }
            if let Some(project_id) = update.project_id {
                bill.project_id = Some(project_id);
            }
            if let Some(amount) = update.amount {
                if amount <= 0 {
                    return Err(ServiceError::Domain(DomainError::validation(
                        "bill amount must be positive",
                    )));
                }
                bill.amount = amount;
                bill.refresh_status();
            }
            Ok(bill.clone())
        })
    }

    /// Delete a bill. Its historical transaction lines remain in the ledger.
    pub fn delete_bill(&self, tenant_id: TenantId, id: &BillId) -> ServiceResult<()> {
        self.store.transact(|state| {
            scoped(&state.bills, tenant_id, id).ok_or_else(ServiceError::not_found)?;
            state.bills.remove(id);
            Ok(())
        })
    }
}

/// Result of a lump-sum vendor payment.
#[derive(Debug, Clone)]
pub struct VendorPaymentOutcome {
    pub advance: Option<VendorAdvance>,
    pub bills_paid: Vec<BillId>,
    pub leftover: Money,
}

/// Apply one payment to one bill inside an open transaction: ledger entry
/// (outflow), payment push + status re-derivation, bank balance delta.
#[allow(clippy::too_many_arguments)]
fn settle_bill(
    state: &mut State,
    tenant_id: TenantId,
    user_id: UserId,
    bill_id: &BillId,
    amount: Money,
    payment_mode: PaymentMode,
    bank_account_id: &BankAccountId,
    vendor_bank_account: Option<String>,
    narration: String,
    date: DateTime<Utc>,
) -> ServiceResult<TransactionLine> {
    // Resolving the account first also validates it belongs to the tenant.
    let account_code = scoped(&state.accounts, tenant_id, bank_account_id)
        .map(|a| a.account_code.clone())
        .ok_or_else(ServiceError::not_found)?;

    let vendor_id = scoped(&state.bills, tenant_id, bill_id)
        .map(|b| b.vendor_id)
        .ok_or_else(ServiceError::not_found)?;

    let entry = NewEntry {
        date,
        direction: Direction::Debit,
        amount,
        debit_account: None,
        credit_account: Some(account_code),
        bank_account_id: Some(*bank_account_id),
        vendor_id: Some(vendor_id),
        employee_id: None,
        project_id: None,
        narration,
        cost_code: None,
    };
    entry.validate()?;
    let line = entry.into_line(tenant_id, user_id, Utc::now());

    let bill =
        scoped_mut(&mut state.bills, tenant_id, bill_id).ok_or_else(ServiceError::not_found)?;
    bill.record_payment(BillPayment {
        amount,
        date,
        payment_mode,
        bank_account_id: *bank_account_id,
        transaction_id: line.id,
        vendor_bank_account,
    })?;

    apply_to_balance(state, tenant_id, bank_account_id, line.signed_amount())?;
    state.entries.insert(line.id, line.clone());
    Ok(line)
}
