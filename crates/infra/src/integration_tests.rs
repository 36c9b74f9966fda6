//! Integration tests for the service layer over the in-memory store.
//!
//! Verifies the end-to-end money-movement invariants:
//! - balance identity (denormalized balance == signed sum of entries)
//! - bill payment scenarios (full, partial-then-full)
//! - project payment recording and symmetric deletion
//! - atomicity of compound writes under mid-operation failure
//! - tenant isolation across every service

use std::sync::Arc;

use chrono::Utc;

use munim_banking::{AccountType, BankName, Ifsc, NewBankAccount};
use munim_billing::{BillId, PaymentMode, PaymentStatus};
use munim_core::{DomainError, TenantId, UserId};
use munim_events::RecordingNotifier;
use munim_ledger::{Direction, EntryFilter, NewEntry};
use munim_loans::{LoanStatus, NewLoan, RiskRating};
use munim_projects::PaymentMethod;
use munim_vendors::{StatementKind, VendorId};

use crate::collaborators::InMemoryFileStorage;
use crate::services::billing::{FileUpload, PayBill, UploadBill, VendorPayment, VendorPaymentKind};
use crate::services::projects::{NewProject, RecordProjectPayment};
use crate::services::vendors::NewVendor;
use crate::services::{
    BankingService, BillingService, LedgerService, LoanService, ProjectService, ServiceError,
    VendorService,
};
use crate::store::MemoryStore;

struct Harness {
    store: Arc<MemoryStore>,
    files: Arc<InMemoryFileStorage>,
    notifier: Arc<RecordingNotifier>,
    banking: BankingService,
    ledger: LedgerService,
    billing: BillingService,
    vendors: VendorService,
    projects: ProjectService,
    loans: LoanService,
    tenant: TenantId,
    user: UserId,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let files = Arc::new(InMemoryFileStorage::new());
    let notifier = Arc::new(RecordingNotifier::new());

    Harness {
        banking: BankingService::new(store.clone()),
        ledger: LedgerService::new(store.clone()),
        billing: BillingService::new(store.clone(), files.clone(), notifier.clone()),
        vendors: VendorService::new(store.clone()),
        projects: ProjectService::new(store.clone(), notifier.clone()),
        loans: LoanService::new(store.clone(), notifier.clone()),
        store,
        files,
        notifier,
        tenant: TenantId::new(),
        user: UserId::new(),
    }
}

impl Harness {
    fn open_account(&self, account_no: &str) -> munim_banking::BankAccount {
        self.banking
            .create_account(
                self.tenant,
                NewBankAccount {
                    bank_name: BankName::Hdfc,
                    account_type: AccountType::Current,
                    account_holder: "Sharma Traders".to_string(),
                    bank_account_no: account_no.to_string(),
                    ifsc: Ifsc::parse("HDFC0001234").unwrap(),
                    branch_name: "MG Road".to_string(),
                    interest_rate: 0.0,
                },
            )
            .unwrap()
    }

    fn seed_vendor(&self) -> VendorId {
        self.vendors
            .create_vendor(
                self.tenant,
                NewVendor {
                    name: "Agarwal Suppliers".to_string(),
                    gst_no: None,
                    phone: None,
                    address: None,
                    bank_accounts: vec![],
                    payment_modes: vec![],
                },
            )
            .unwrap()
            .id
    }

    fn seed_bill(&self, vendor_id: VendorId, amount: i64) -> BillId {
        self.billing
            .upload_bill(
                self.tenant,
                UploadBill {
                    vendor_id,
                    bill_no: format!("B-{amount}"),
                    bill_date: Utc::now(),
                    amount,
                    project_id: None,
                    file: None,
                },
            )
            .unwrap()
            .id
    }

    fn deposit(&self, account_id: munim_banking::BankAccountId, amount: i64) {
        self.ledger
            .record_entry(
                self.tenant,
                self.user,
                NewEntry {
                    date: Utc::now(),
                    direction: Direction::Credit,
                    amount,
                    debit_account: None,
                    credit_account: None,
                    bank_account_id: Some(account_id),
                    vendor_id: None,
                    employee_id: None,
                    project_id: None,
                    narration: "Opening deposit".to_string(),
                    cost_code: None,
                },
            )
            .unwrap();
    }
}

#[test]
fn balance_identity_holds_across_creates_and_deletes() {
    let h = harness();
    let account = h.open_account("001");

    h.deposit(account.id, 10_000);
    let withdrawal = h
        .ledger
        .record_entry(
            h.tenant,
            h.user,
            NewEntry {
                date: Utc::now(),
                direction: Direction::Debit,
                amount: 3_000,
                debit_account: None,
                credit_account: None,
                bank_account_id: Some(account.id),
                vendor_id: None,
                employee_id: None,
                project_id: None,
                narration: "Rent".to_string(),
                cost_code: None,
            },
        )
        .unwrap();

    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        7_000
    );

    // Deleting an entry applies the compensating delta.
    h.ledger.delete_entry(h.tenant, &withdrawal.id).unwrap();
    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        10_000
    );

    // Reconstruction agrees with the denormalized field.
    let rows = h.banking.reconstruct_ledger(h.tenant, &account.id).unwrap();
    assert_eq!(rows.last().unwrap().running_balance, 10_000);
}

#[test]
fn bill_full_payment_scenario() {
    let h = harness();
    let account = h.open_account("002");
    h.deposit(account.id, 5_000);
    let vendor = h.seed_vendor();
    let bill_id = h.seed_bill(vendor, 1_000);

    let bill = h
        .billing
        .pay_bill(
            h.tenant,
            h.user,
            &bill_id,
            PayBill {
                bank_account_id: account.id,
                payment_mode: PaymentMode::Neft,
                amount: Some(1_000),
                narration: None,
                vendor_bank_account: None,
            },
        )
        .unwrap();

    assert!(bill.is_paid);
    assert_eq!(bill.payment_status, PaymentStatus::Paid);

    // Exactly one outflow entry of -1000 tagged to the bank and vendor.
    let entries = h
        .ledger
        .list_entries(
            h.tenant,
            &EntryFilter {
                vendor_id: Some(vendor),
                ..EntryFilter::default()
            },
        )
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].signed_amount(), -1_000);
    assert_eq!(entries[0].bank_account_id, Some(account.id));

    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        4_000
    );
}

#[test]
fn bill_partial_then_full_payment() {
    let h = harness();
    let account = h.open_account("003");
    h.deposit(account.id, 5_000);
    let vendor = h.seed_vendor();
    let bill_id = h.seed_bill(vendor, 1_000);

    let pay = |amount| PayBill {
        bank_account_id: account.id,
        payment_mode: PaymentMode::Upi,
        amount: Some(amount),
        narration: None,
        vendor_bank_account: None,
    };

    let bill = h.billing.pay_bill(h.tenant, h.user, &bill_id, pay(400)).unwrap();
    assert_eq!(bill.payment_status, PaymentStatus::Partial);
    assert!(!bill.is_paid);

    let bill = h.billing.pay_bill(h.tenant, h.user, &bill_id, pay(600)).unwrap();
    assert_eq!(bill.payment_status, PaymentStatus::Paid);
    assert_eq!(bill.paid_sum(), 1_000);

    // A third payment is rejected and changes nothing.
    let err = h.billing.pay_bill(h.tenant, h.user, &bill_id, pay(1)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvariantViolation(_))
    ));
    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        4_000
    );
}

#[test]
fn pay_bill_against_missing_account_leaves_no_trace() {
    let h = harness();
    let vendor = h.seed_vendor();
    let bill_id = h.seed_bill(vendor, 1_000);

    // The bank account does not exist: the compound write must abort with
    // nothing applied — no entry, no payment, no status change.
    let err = h
        .billing
        .pay_bill(
            h.tenant,
            h.user,
            &bill_id,
            PayBill {
                bank_account_id: munim_banking::BankAccountId::new(),
                payment_mode: PaymentMode::Neft,
                amount: Some(500),
                narration: None,
                vendor_bank_account: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotFound)));

    let bill = h.billing.get_bill(h.tenant, &bill_id).unwrap();
    assert_eq!(bill.payment_status, PaymentStatus::Pending);
    assert!(bill.payments.is_empty());
    assert!(h
        .ledger
        .list_entries(h.tenant, &EntryFilter::default())
        .unwrap()
        .is_empty());
}

#[test]
fn vendor_payment_settles_bills_greedily_and_drops_leftover() {
    let h = harness();
    let account = h.open_account("004");
    h.deposit(account.id, 10_000);
    let vendor = h.seed_vendor();
    let first = h.seed_bill(vendor, 400);
    let second = h.seed_bill(vendor, 500);

    let outcome = h
        .billing
        .create_vendor_payment(
            h.tenant,
            h.user,
            VendorPayment {
                vendor_id: vendor,
                amount: 1_000,
                date: Utc::now(),
                kind: VendorPaymentKind::Bill,
                bill_ids: vec![first, second],
                bank_account_id: Some(account.id),
                payment_mode: Some(PaymentMode::Rtgs),
            },
        )
        .unwrap();

    assert_eq!(outcome.bills_paid, vec![first, second]);
    assert_eq!(outcome.leftover, 100);

    assert!(h.billing.get_bill(h.tenant, &first).unwrap().is_paid);
    assert!(h.billing.get_bill(h.tenant, &second).unwrap().is_paid);
    // Only the applied 900 left the bank; the leftover was dropped, not
    // withdrawn.
    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        9_100
    );
}

#[test]
fn vendor_payment_with_unknown_bill_rolls_back_entirely() {
    let h = harness();
    let account = h.open_account("005");
    h.deposit(account.id, 10_000);
    let vendor = h.seed_vendor();
    let first = h.seed_bill(vendor, 400);

    let err = h
        .billing
        .create_vendor_payment(
            h.tenant,
            h.user,
            VendorPayment {
                vendor_id: vendor,
                amount: 1_000,
                date: Utc::now(),
                kind: VendorPaymentKind::Bill,
                bill_ids: vec![first, BillId::new()],
                bank_account_id: Some(account.id),
                payment_mode: Some(PaymentMode::Neft),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotFound)));

    // The first bill's settlement must not have survived the abort.
    let bill = h.billing.get_bill(h.tenant, &first).unwrap();
    assert_eq!(bill.payment_status, PaymentStatus::Pending);
    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        10_000
    );
}

#[test]
fn vendor_advance_and_statement() {
    let h = harness();
    let account = h.open_account("006");
    h.deposit(account.id, 5_000);
    let vendor = h.seed_vendor();
    let bill_id = h.seed_bill(vendor, 1_000);

    h.billing
        .pay_bill(
            h.tenant,
            h.user,
            &bill_id,
            PayBill {
                bank_account_id: account.id,
                payment_mode: PaymentMode::Cheque,
                amount: Some(400),
                narration: None,
                vendor_bank_account: None,
            },
        )
        .unwrap();
    h.vendors
        .record_advance(h.tenant, &vendor, 200, Utc::now())
        .unwrap();

    let statement = h.vendors.statement(h.tenant, &vendor).unwrap();
    assert_eq!(statement.len(), 3);

    // Bill is a credit; payment and advance are debits.
    let bill_row = statement
        .iter()
        .find(|l| l.kind == StatementKind::Bill)
        .unwrap();
    assert_eq!(bill_row.credit, 1_000);
    let advance_row = statement
        .iter()
        .find(|l| l.kind == StatementKind::Advance)
        .unwrap();
    assert_eq!(advance_row.debit, 200);

    // balance = sum(debit - credit) = 400 + 200 - 1000.
    assert_eq!(statement.last().unwrap().balance, -400);
}

#[test]
fn upload_failure_creates_no_bill() {
    let h = harness();
    let vendor = h.seed_vendor();
    h.files.fail_uploads(true);

    let err = h
        .billing
        .upload_bill(
            h.tenant,
            UploadBill {
                vendor_id: vendor,
                bill_no: "B-9".to_string(),
                bill_date: Utc::now(),
                amount: 900,
                project_id: None,
                file: Some(FileUpload {
                    buffer: b"%PDF-1.4".to_vec(),
                    filename: "bill.pdf".to_string(),
                    mimetype: "application/pdf".to_string(),
                }),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::FileStorage(_)));
    assert!(h.billing.list_bills(h.tenant, None).unwrap().is_empty());
}

#[test]
fn project_payment_then_deletion_restores_everything() {
    let h = harness();
    let account = h.open_account("007");
    h.deposit(account.id, 1_000);
    let project = h
        .projects
        .create_project(
            h.tenant,
            NewProject {
                name: "Warehouse fit-out".to_string(),
                client: "Mehta & Co".to_string(),
                budget: 5_000,
            },
        )
        .unwrap();

    let payment = h
        .projects
        .record_payment(
            h.tenant,
            h.user,
            &project.id,
            RecordProjectPayment {
                amount: 2_000,
                payment_date: Utc::now(),
                payment_method: PaymentMethod::BankTransfer,
                bank_account_id: Some(account.id),
            },
        )
        .unwrap();

    assert_eq!(
        h.projects.get_project(h.tenant, &project.id).unwrap().received_amount,
        2_000
    );
    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        3_000
    );

    // The paired ledger entry credits the synthetic income account.
    let entry = h.ledger.get_entry(h.tenant, &payment.transaction_id).unwrap();
    assert_eq!(entry.credit_account.as_deref(), Some("income:project"));
    assert_eq!(entry.signed_amount(), 2_000);

    h.projects.delete_payment(h.tenant, &payment.id).unwrap();
    assert_eq!(
        h.projects.get_project(h.tenant, &project.id).unwrap().received_amount,
        0
    );
    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        1_000
    );
    assert!(matches!(
        h.ledger.get_entry(h.tenant, &payment.transaction_id),
        Err(ServiceError::Domain(DomainError::NotFound))
    ));
}

#[test]
fn non_transfer_project_payment_into_account_moves_the_balance() {
    let h = harness();
    let account = h.open_account("011");
    let project = h
        .projects
        .create_project(
            h.tenant,
            NewProject {
                name: "Interior works".to_string(),
                client: "Mehta & Co".to_string(),
                budget: 2_000,
            },
        )
        .unwrap();

    // A UPI payment tagged to a bank account moves that account's balance
    // just like a bank transfer: the entry is bank-scoped, so the balance
    // must follow or the signed entry sum and `current_balance` diverge.
    let payment = h
        .projects
        .record_payment(
            h.tenant,
            h.user,
            &project.id,
            RecordProjectPayment {
                amount: 500,
                payment_date: Utc::now(),
                payment_method: PaymentMethod::Upi,
                bank_account_id: Some(account.id),
            },
        )
        .unwrap();

    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        500
    );
    let rows = h.banking.reconstruct_ledger(h.tenant, &account.id).unwrap();
    assert_eq!(rows.last().unwrap().running_balance, 500);

    // Deletion reverses the same delta.
    h.projects.delete_payment(h.tenant, &payment.id).unwrap();
    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        0
    );
}

#[test]
fn project_payment_against_missing_account_aborts_whole_transaction() {
    let h = harness();
    let project = h
        .projects
        .create_project(
            h.tenant,
            NewProject {
                name: "Site survey".to_string(),
                client: "Mehta & Co".to_string(),
                budget: 1_000,
            },
        )
        .unwrap();

    let err = h
        .projects
        .record_payment(
            h.tenant,
            h.user,
            &project.id,
            RecordProjectPayment {
                amount: 500,
                payment_date: Utc::now(),
                payment_method: PaymentMethod::BankTransfer,
                bank_account_id: Some(munim_banking::BankAccountId::new()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotFound)));

    // No payment, no entry, no receivable change.
    assert!(h.projects.list_payments(h.tenant, &project.id).unwrap().is_empty());
    assert!(h
        .ledger
        .list_entries(h.tenant, &EntryFilter::default())
        .unwrap()
        .is_empty());
    assert_eq!(
        h.projects.get_project(h.tenant, &project.id).unwrap().received_amount,
        0
    );
}

#[test]
fn tenant_isolation_across_services() {
    let h = harness();
    let account = h.open_account("008");
    h.deposit(account.id, 5_000);
    let vendor = h.seed_vendor();
    let bill_id = h.seed_bill(vendor, 1_000);

    let intruder = TenantId::new();

    // Reads come back not-found, indistinguishable from absence.
    assert!(matches!(
        h.banking.get_account(intruder, &account.id),
        Err(ServiceError::Domain(DomainError::NotFound))
    ));
    assert!(matches!(
        h.billing.get_bill(intruder, &bill_id),
        Err(ServiceError::Domain(DomainError::NotFound))
    ));
    assert!(h
        .ledger
        .list_entries(intruder, &EntryFilter::default())
        .unwrap()
        .is_empty());

    // Writes fail the same way and change nothing in the victim tenant.
    let err = h
        .billing
        .pay_bill(
            intruder,
            h.user,
            &bill_id,
            PayBill {
                bank_account_id: account.id,
                payment_mode: PaymentMode::Neft,
                amount: Some(100),
                narration: None,
                vendor_bank_account: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotFound)));
    assert_eq!(
        h.banking.get_account(h.tenant, &account.id).unwrap().current_balance,
        5_000
    );
}

#[test]
fn duplicate_account_number_is_rejected() {
    let h = harness();
    h.open_account("009");

    let err = h
        .banking
        .create_account(
            h.tenant,
            NewBankAccount {
                bank_name: BankName::Icici,
                account_type: AccountType::Savings,
                account_holder: "Someone Else".to_string(),
                bank_account_no: "009".to_string(),
                ifsc: Ifsc::parse("ICIC0004321").unwrap(),
                branch_name: "Indiranagar".to_string(),
                interest_rate: 3.0,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));

    // The same number in another tenant is fine: uniqueness is per tenant.
    h.banking
        .create_account(
            TenantId::new(),
            NewBankAccount {
                bank_name: BankName::Hdfc,
                account_type: AccountType::Current,
                account_holder: "Another Tenant".to_string(),
                bank_account_no: "009".to_string(),
                ifsc: Ifsc::parse("HDFC0001234").unwrap(),
                branch_name: "MG Road".to_string(),
                interest_rate: 0.0,
            },
        )
        .unwrap();
}

#[test]
fn loan_lifecycle_end_to_end() {
    let h = harness();
    let loan = h
        .loans
        .create_loan(
            h.tenant,
            NewLoan {
                loan_number: "LN-7".to_string(),
                applicant: "R. Gupta".to_string(),
                amount: 100_000,
                interest_rate: 12.0,
                tenure_months: 12,
                pending_documents: 0,
                has_guarantor: true,
                has_collateral: true,
            },
        )
        .unwrap();
    assert_eq!(loan.status, LoanStatus::Applied);
    assert_eq!(loan.monthly_installment, 8_885);
    assert_eq!(loan.risk_rating, RiskRating::Low);

    h.loans.approve(h.tenant, &loan.id).unwrap();
    h.loans.disburse(h.tenant, &loan.id).unwrap();

    let after = h.loans.record_payment(h.tenant, &loan.id, 8_885).unwrap();
    assert_eq!(after.status, LoanStatus::Repaying);
    assert_eq!(after.remaining_balance, 100_000 - 8_885);

    let closed = h
        .loans
        .record_payment(h.tenant, &loan.id, after.remaining_balance)
        .unwrap();
    assert_eq!(closed.status, LoanStatus::Closed);
    assert_eq!(closed.remaining_balance, 0);

    // Closed loans drop out of the due scan.
    assert!(h
        .loans
        .due_for_notification(h.tenant, Utc::now() + chrono::Duration::days(60))
        .unwrap()
        .is_empty());
}

#[test]
fn notifications_are_emitted_but_never_required() {
    let h = harness();
    let vendor = h.seed_vendor();
    h.seed_bill(vendor, 700);

    let events: Vec<String> = h.notifier.emitted().into_iter().map(|n| n.event).collect();
    assert_eq!(events, vec!["billing.bill_uploaded".to_string()]);
    assert!(h.notifier.emitted().iter().all(|n| n.tenant_id == h.tenant));

    // Store state stays the source of truth regardless of listeners.
    assert_eq!(h.store.read(|s| s.bills.len()).unwrap(), 1);
}
