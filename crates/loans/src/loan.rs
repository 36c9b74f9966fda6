use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use munim_core::{DomainError, DomainResult, Entity, Money, TenantId, define_id};

use crate::emi::{InstallmentStatus, ScheduleRow, calculate_emi, calculate_schedule};
use crate::risk::{RiskFactors, RiskRating, calculate_risk_rating};

define_id!(
    /// Loan identifier.
    LoanId
);

/// Loan lifecycle. Advances strictly forward; `Closed` and `Defaulted` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanStatus {
    Applied,
    Approved,
    Disbursed,
    Repaying,
    Closed,
    Defaulted,
}

/// One recorded repayment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub amount: Money,
    pub date: DateTime<Utc>,
    /// Days past `next_payment_due` at the time of payment (0 when on time).
    pub days_late: i64,
}

/// Loan document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub loan_number: String,
    pub applicant: String,
    pub amount: Money,
    pub interest_rate: f64,
    pub tenure_months: u32,
    pub monthly_installment: Money,
    pub remaining_balance: Money,
    pub schedule: Vec<ScheduleRow>,
    pub payments: Vec<LoanPayment>,
    pub risk_rating: RiskRating,
    pub status: LoanStatus,
    /// Set at disbursement; advanced a fixed 30 days per payment (documented
    /// simplification — not calendar-month-aware).
    pub next_payment_due: Option<DateTime<Utc>>,
    pub late_payments: u32,
    /// Lateness of the most recent payment.
    pub days_late: i64,
    pub pending_documents: u32,
    pub has_guarantor: bool,
    pub has_collateral: bool,
    pub tenant_id: TenantId,
    pub created_at: DateTime<Utc>,
}

/// Validated loan application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoan {
    pub loan_number: String,
    pub applicant: String,
    pub amount: Money,
    pub interest_rate: f64,
    pub tenure_months: u32,
    pub pending_documents: u32,
    pub has_guarantor: bool,
    pub has_collateral: bool,
}

impl NewLoan {
    pub fn validate(&self) -> DomainResult<()> {
        if self.loan_number.trim().is_empty() {
            return Err(DomainError::validation("loan number is required"));
        }
        if self.applicant.trim().is_empty() {
            return Err(DomainError::validation("applicant is required"));
        }
        if self.amount <= 0 {
            return Err(DomainError::validation("loan amount must be positive"));
        }
        if self.interest_rate < 0.0 {
            return Err(DomainError::validation("interest rate cannot be negative"));
        }
        if self.tenure_months == 0 {
            return Err(DomainError::validation("tenure must be at least one month"));
        }
        Ok(())
    }

    pub fn into_loan(self, tenant_id: TenantId, now: DateTime<Utc>) -> Loan {
        let monthly_installment = calculate_emi(self.amount, self.interest_rate, self.tenure_months);
        let schedule = calculate_schedule(self.amount, self.interest_rate, self.tenure_months);
        let mut loan = Loan {
            id: LoanId::new(),
            loan_number: self.loan_number,
            applicant: self.applicant,
            amount: self.amount,
            interest_rate: self.interest_rate,
            tenure_months: self.tenure_months,
            monthly_installment,
            remaining_balance: self.amount,
            schedule,
            payments: Vec::new(),
            risk_rating: RiskRating::Low,
            status: LoanStatus::Applied,
            next_payment_due: None,
            late_payments: 0,
            days_late: 0,
            pending_documents: self.pending_documents,
            has_guarantor: self.has_guarantor,
            has_collateral: self.has_collateral,
            tenant_id,
            created_at: now,
        };
        loan.refresh_risk();
        loan
    }
}

impl Loan {
    fn risk_factors(&self) -> RiskFactors {
        RiskFactors {
            amount: self.amount,
            annual_rate_percent: self.interest_rate,
            tenure_months: self.tenure_months,
            late_payments: self.late_payments,
            pending_documents: self.pending_documents,
            has_guarantor: self.has_guarantor,
            has_collateral: self.has_collateral,
        }
    }

    /// Recompute the heuristic rating from current state.
    pub fn refresh_risk(&mut self) {
        self.risk_rating = calculate_risk_rating(&self.risk_factors());
    }

    pub fn approve(&mut self) -> DomainResult<()> {
        if self.status != LoanStatus::Applied {
            return Err(DomainError::invariant(format!(
                "cannot approve a loan in status {:?}",
                self.status
            )));
        }
        self.status = LoanStatus::Approved;
        Ok(())
    }

    pub fn disburse(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != LoanStatus::Approved {
            return Err(DomainError::invariant(format!(
                "cannot disburse a loan in status {:?}",
                self.status
            )));
        }
        self.status = LoanStatus::Disbursed;
        self.next_payment_due = Some(now + Duration::days(30));
        Ok(())
    }

    /// Record a repayment.
    ///
    /// Lateness is judged against `next_payment_due` at the moment of
    /// payment; the due date then advances by a fixed 30 days. The loan
    /// closes once the remaining balance reaches zero.
    pub fn record_payment(&mut self, amount: Money, now: DateTime<Utc>) -> DomainResult<()> {
        if !matches!(self.status, LoanStatus::Disbursed | LoanStatus::Repaying) {
            return Err(DomainError::invariant(format!(
                "cannot record a payment on a loan in status {:?}",
                self.status
            )));
        }
        if amount <= 0 {
            return Err(DomainError::validation("payment amount must be positive"));
        }

        let due = self
            .next_payment_due
            .ok_or_else(|| DomainError::invariant("disbursed loan is missing a due date"))?;

        let days_late = (now - due).num_days().max(0);
        if days_late > 0 {
            self.late_payments += 1;
        }
        self.days_late = days_late;

        self.payments.push(LoanPayment {
            amount,
            date: now,
            days_late,
        });
        self.remaining_balance = (self.remaining_balance - amount).max(0);
        self.next_payment_due = Some(due + Duration::days(30));

        if let Some(row) = self
            .schedule
            .iter_mut()
            .find(|r| r.status == InstallmentStatus::Pending)
        {
            row.status = InstallmentStatus::Paid;
        }

        self.refresh_risk();

        if self.remaining_balance == 0 {
            self.status = LoanStatus::Closed;
            self.next_payment_due = None;
        } else {
            self.status = LoanStatus::Repaying;
        }
        Ok(())
    }

    pub fn mark_defaulted(&mut self) -> DomainResult<()> {
        if matches!(self.status, LoanStatus::Closed | LoanStatus::Defaulted) {
            return Err(DomainError::invariant(format!(
                "cannot default a loan in status {:?}",
                self.status
            )));
        }
        self.status = LoanStatus::Defaulted;
        Ok(())
    }

    /// Whether this loan should appear in the daily due/overdue notification
    /// scan (an external consumer of the loan collection).
    pub fn is_due_for_notification(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, LoanStatus::Disbursed | LoanStatus::Repaying)
            && self
                .next_payment_due
                .is_some_and(|due| due <= now + Duration::days(3))
    }
}

impl Entity for Loan {
    type Id = LoanId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
