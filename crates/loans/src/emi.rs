//! EMI and amortization schedule calculation. Pure; no I/O.

use serde::{Deserialize, Serialize};

use munim_core::Money;

/// Equated monthly installment.
///
/// `P×r×(1+r)^n / ((1+r)^n − 1)` with `r = annual_rate/12/100`, rounded to the
/// nearest integer currency unit. A zero rate degenerates to simple division.
pub fn calculate_emi(principal: Money, annual_rate_percent: f64, tenure_months: u32) -> Money {
    if tenure_months == 0 {
        return 0;
    }
    if annual_rate_percent == 0.0 {
        return ((principal as f64) / (tenure_months as f64)).round() as Money;
    }

    let p = principal as f64;
    let r = annual_rate_percent / 12.0 / 100.0;
    let n = tenure_months as f64;
    let factor = (1.0 + r).powf(n);
    ((p * r * factor) / (factor - 1.0)).round() as Money
}

/// Status of one scheduled installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Overdue,
}

/// One row of the amortization table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based month number.
    pub month: u32,
    pub emi: Money,
    pub interest: Money,
    pub principal: Money,
    pub remaining_balance: Money,
    pub status: InstallmentStatus,
}

/// Month-by-month amortization table.
///
/// Each month: interest = balance × monthly rate, principal = emi − interest,
/// balance floored at zero (the final installment absorbs rounding drift).
pub fn calculate_schedule(
    principal: Money,
    annual_rate_percent: f64,
    tenure_months: u32,
) -> Vec<ScheduleRow> {
    let emi = calculate_emi(principal, annual_rate_percent, tenure_months);
    let monthly_rate = annual_rate_percent / 12.0 / 100.0;

    let mut balance = principal;
    let mut rows = Vec::with_capacity(tenure_months as usize);

    for month in 1..=tenure_months {
        let interest = ((balance as f64) * monthly_rate).round() as Money;
        // The final installment absorbs rounding drift so the table always
        // amortizes to exactly zero.
        let principal_paid = if month == tenure_months {
            balance
        } else {
            (emi - interest).clamp(0, balance)
        };
        balance -= principal_paid;

        rows.push(ScheduleRow {
            month,
            emi,
            interest,
            principal: principal_paid,
            remaining_balance: balance,
            status: InstallmentStatus::Pending,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn emi_matches_standard_amortization_value() {
        // 100000 at 12% over 12 months: the textbook value, rounded.
        assert_eq!(calculate_emi(100_000, 12.0, 12), 8_885);
    }

    #[test]
    fn zero_rate_is_simple_division() {
        assert_eq!(calculate_emi(120_000, 0.0, 12), 10_000);
        assert_eq!(calculate_emi(100, 0.0, 3), 33);
    }

    #[test]
    fn zero_tenure_yields_zero_emi() {
        assert_eq!(calculate_emi(100_000, 12.0, 0), 0);
        assert!(calculate_schedule(100_000, 12.0, 0).is_empty());
    }

    #[test]
    fn schedule_amortizes_to_zero() {
        let rows = calculate_schedule(100_000, 12.0, 12);
        assert_eq!(rows.len(), 12);
        assert_eq!(rows.last().unwrap().remaining_balance, 0);

        // First month's interest is balance × 1%.
        assert_eq!(rows[0].interest, 1_000);
        assert_eq!(rows[0].principal, rows[0].emi - 1_000);
    }

    #[test]
    fn schedule_balance_is_strictly_decreasing() {
        let rows = calculate_schedule(500_000, 10.5, 24);
        let mut prev = 500_000;
        for row in &rows {
            assert!(row.remaining_balance < prev);
            prev = row.remaining_balance;
        }
    }

    proptest! {
        /// Property: principal paid across the schedule sums back to the
        /// loan principal, for any rate/tenure.
        #[test]
        fn schedule_principal_sums_to_loan_principal(
            principal in 10_000i64..10_000_000i64,
            rate in 0.0f64..24.0,
            tenure in 1u32..120,
        ) {
            let rows = calculate_schedule(principal, rate, tenure);
            let total: i64 = rows.iter().map(|r| r.principal).sum();
            prop_assert_eq!(total, principal);
            prop_assert_eq!(rows.last().unwrap().remaining_balance, 0);
        }
    }
}
