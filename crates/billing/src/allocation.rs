//! Greedy allocation of a lump-sum vendor payment across bills.
//!
//! Bills are paid in the supplied order; each receives
//! `min(remaining, outstanding)`. Whatever is left after the list is
//! exhausted is returned as `leftover` — the caller decides what to do with
//! it (currently: log and drop; see DESIGN.md).

use munim_core::Money;

use crate::bill::{BillId, PurchaseBill};

/// One planned application of money to a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub bill_id: BillId,
    pub amount: Money,
}

/// Plan the greedy split. Pure: does not mutate the bills.
///
/// Fully-paid bills in the list absorb nothing and produce no allocation.
pub fn allocate_across_bills(total: Money, bills: &[&PurchaseBill]) -> (Vec<Allocation>, Money) {
    let mut remaining = total.max(0);
    let mut allocations = Vec::new();

    for bill in bills {
        if remaining == 0 {
            break;
        }
        let applied = remaining.min(bill.outstanding());
        if applied > 0 {
            allocations.push(Allocation {
                bill_id: bill.id,
                amount: applied,
            });
            remaining -= applied;
        }
    }

    (allocations, remaining)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use munim_core::TenantId;
    use munim_vendors::VendorId;

    use super::*;

    fn bill(amount: Money) -> PurchaseBill {
        PurchaseBill::new(
            VendorId::new(),
            "B-1".to_string(),
            Utc::now(),
            amount,
            None,
            None,
            TenantId::new(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn allocates_in_order_until_exhausted() {
        let a = bill(400);
        let b = bill(500);
        let c = bill(300);

        let (allocations, leftover) = allocate_across_bills(700, &[&a, &b, &c]);

        assert_eq!(leftover, 0);
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0], Allocation { bill_id: a.id, amount: 400 });
        assert_eq!(allocations[1], Allocation { bill_id: b.id, amount: 300 });
    }

    #[test]
    fn leftover_is_reported_when_bills_run_out() {
        let a = bill(100);
        let (allocations, leftover) = allocate_across_bills(250, &[&a]);

        assert_eq!(allocations, vec![Allocation { bill_id: a.id, amount: 100 }]);
        assert_eq!(leftover, 150);
    }

    #[test]
    fn partially_paid_bills_only_absorb_their_outstanding() {
        let mut a = bill(1_000);
        a.record_payment(crate::bill::BillPayment {
            amount: 600,
            date: Utc::now(),
            payment_mode: crate::bill::PaymentMode::Upi,
            bank_account_id: munim_banking::BankAccountId::new(),
            transaction_id: munim_core::EntryId::new(),
            vendor_bank_account: None,
        })
        .unwrap();

        let (allocations, leftover) = allocate_across_bills(500, &[&a]);
        assert_eq!(allocations[0].amount, 400);
        assert_eq!(leftover, 100);
    }

    #[test]
    fn empty_bill_list_returns_everything_as_leftover() {
        let (allocations, leftover) = allocate_across_bills(250, &[]);
        assert!(allocations.is_empty());
        assert_eq!(leftover, 250);
    }
}
