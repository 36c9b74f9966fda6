use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use munim_banking::BankAccountId;
use munim_core::{DomainError, DomainResult, Entity, EntryId, Money, TenantId, define_id, money};
use munim_projects::ProjectId;
use munim_vendors::VendorId;

define_id!(
    /// Purchase bill identifier.
    BillId
);

/// Accepted payment modes for bill settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMode {
    Upi,
    Neft,
    Rtgs,
    Imps,
    Cheque,
}

/// Payment state, derived — never assigned directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

/// Derive the status from the payments sum vs the bill amount.
///
/// Sums at or above the amount clamp to `Paid` (covers the bill-amount-edit
/// case where payments already exceed the new total).
pub fn derive_status(paid_sum: Money, bill_amount: Money) -> PaymentStatus {
    if paid_sum <= 0 {
        PaymentStatus::Pending
    } else if paid_sum < bill_amount {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Paid
    }
}

/// One payment recorded against a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillPayment {
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub payment_mode: PaymentMode,
    pub bank_account_id: BankAccountId,
    /// The ledger entry that moved the money.
    pub transaction_id: EntryId,
    /// Vendor-side account reference, free-form.
    pub vendor_bank_account: Option<String>,
}

/// Purchase bill owed to a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseBill {
    pub id: BillId,
    pub vendor_id: VendorId,
    pub bill_no: String,
    pub bill_date: DateTime<Utc>,
    /// Total owed.
    pub amount: Money,
    pub project_id: Option<ProjectId>,
    pub file_url: Option<String>,
    pub is_paid: bool,
    pub payment_status: PaymentStatus,
    pub payments: Vec<BillPayment>,
    pub related_txn_id: Option<EntryId>,
    pub tenant_id: TenantId,
    pub created_at: DateTime<Utc>,
}

impl PurchaseBill {
    pub fn new(
        vendor_id: VendorId,
        bill_no: String,
        bill_date: DateTime<Utc>,
        amount: Money,
        project_id: Option<ProjectId>,
        file_url: Option<String>,
        tenant_id: TenantId,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if bill_no.trim().is_empty() {
            return Err(DomainError::validation("bill number is required"));
        }
        if amount <= 0 {
            return Err(DomainError::validation("bill amount must be positive"));
        }
        Ok(Self {
            id: BillId::new(),
            vendor_id,
            bill_no,
            bill_date,
            amount,
            project_id,
            file_url,
            is_paid: false,
            payment_status: PaymentStatus::Pending,
            payments: Vec::new(),
            related_txn_id: None,
            tenant_id,
            created_at: now,
        })
    }

    /// Sum of recorded payments, saturating.
    pub fn paid_sum(&self) -> Money {
        money::narrow_saturating(money::sum_amounts(self.payments.iter().map(|p| p.amount)))
    }

    /// What is still owed.
    pub fn outstanding(&self) -> Money {
        (self.amount - self.paid_sum()).max(0)
    }

    /// Append a payment and re-derive status. The caller has already created
    /// the paired ledger entry; this only mutates the bill document.
    pub fn record_payment(&mut self, payment: BillPayment) -> DomainResult<()> {
        if self.payment_status == PaymentStatus::Paid {
            return Err(DomainError::invariant("bill is already fully paid"));
        }
        if payment.amount <= 0 {
            return Err(DomainError::validation("payment amount must be positive"));
        }
        if payment.amount > self.outstanding() {
            return Err(DomainError::invariant(format!(
                "payment {} exceeds outstanding {}",
                payment.amount,
                self.outstanding()
            )));
        }

        self.payments.push(payment);
        self.refresh_status();
        Ok(())
    }

    /// Re-derive `payment_status`/`is_paid` from the payments sum.
    pub fn refresh_status(&mut self) {
        self.payment_status = derive_status(self.paid_sum(), self.amount);
        self.is_paid = self.payment_status == PaymentStatus::Paid;
    }
}

impl Entity for PurchaseBill {
    type Id = BillId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn bill(amount: Money) -> PurchaseBill {
        PurchaseBill::new(
            VendorId::new(),
            "B-42".to_string(),
            Utc::now(),
            amount,
            None,
            None,
            TenantId::new(),
            Utc::now(),
        )
        .unwrap()
    }

    fn payment(amount: Money) -> BillPayment {
        BillPayment {
            amount,
            date: Utc::now(),
            payment_mode: PaymentMode::Neft,
            bank_account_id: BankAccountId::new(),
            transaction_id: EntryId::new(),
            vendor_bank_account: None,
        }
    }

    #[test]
    fn status_derivation_covers_all_bands() {
        assert_eq!(derive_status(0, 1_000), PaymentStatus::Pending);
        assert_eq!(derive_status(400, 1_000), PaymentStatus::Partial);
        assert_eq!(derive_status(1_000, 1_000), PaymentStatus::Paid);
        assert_eq!(derive_status(1_200, 1_000), PaymentStatus::Paid);
    }

    #[test]
    fn partial_then_full_payment() {
        let mut bill = bill(1_000);

        bill.record_payment(payment(400)).unwrap();
        assert_eq!(bill.payment_status, PaymentStatus::Partial);
        assert!(!bill.is_paid);

        bill.record_payment(payment(600)).unwrap();
        assert_eq!(bill.payment_status, PaymentStatus::Paid);
        assert!(bill.is_paid);
        assert_eq!(bill.paid_sum(), 1_000);
    }

    #[test]
    fn paying_a_paid_bill_is_rejected() {
        let mut bill = bill(500);
        bill.record_payment(payment(500)).unwrap();

        let err = bill.record_payment(payment(1)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn overpayment_is_rejected() {
        let mut bill = bill(500);
        bill.record_payment(payment(300)).unwrap();

        let err = bill.record_payment(payment(300)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        // The failed attempt left nothing behind.
        assert_eq!(bill.paid_sum(), 300);
        assert_eq!(bill.payment_status, PaymentStatus::Partial);
    }

    #[test]
    fn amount_edit_below_paid_sum_clamps_status_at_paid() {
        let mut bill = bill(1_000);
        bill.record_payment(payment(800)).unwrap();

        bill.amount = 700;
        bill.refresh_status();
        assert_eq!(bill.payment_status, PaymentStatus::Paid);
    }

    proptest! {
        /// Property: under any accepted sequence of payments, the paid sum is
        /// non-decreasing, never exceeds the bill amount, and the status only
        /// moves forward (pending → partial → paid).
        #[test]
        fn payment_monotonicity(
            amount in 1i64..100_000i64,
            attempts in prop::collection::vec(1i64..60_000i64, 1..20)
        ) {
            let mut bill = bill(amount);
            let mut last_sum = 0;
            let mut last_rank = 0; // pending=0, partial=1, paid=2

            for attempt in attempts {
                let _ = bill.record_payment(payment(attempt));

                let sum = bill.paid_sum();
                prop_assert!(sum >= last_sum);
                prop_assert!(sum <= bill.amount);

                let rank = match bill.payment_status {
                    PaymentStatus::Pending => 0,
                    PaymentStatus::Partial => 1,
                    PaymentStatus::Paid => 2,
                };
                prop_assert!(rank >= last_rank);

                last_sum = sum;
                last_rank = rank;
            }
        }
    }
}
