//! Heuristic risk scoring.
//!
//! This is a stated business heuristic, not a statistical model; the weights
//! and thresholds must not be "tuned" without a product decision.

use serde::{Deserialize, Serialize};

use munim_core::Money;

/// Risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskRating {
    Low,
    Medium,
    High,
}

/// Everything the heuristic looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub amount: Money,
    pub annual_rate_percent: f64,
    pub tenure_months: u32,
    pub late_payments: u32,
    pub pending_documents: u32,
    pub has_guarantor: bool,
    pub has_collateral: bool,
}

/// Weighted score, thresholded: `< 2 → Low`, `< 4 → Medium`, else `High`.
pub fn calculate_risk_rating(factors: &RiskFactors) -> RiskRating {
    let mut score = 0.0;

    if factors.amount > 1_000_000 {
        score += 2.0;
    } else if factors.amount > 500_000 {
        score += 1.0;
    }

    if factors.annual_rate_percent > 12.0 {
        score += 1.0;
    }

    if factors.tenure_months > 60 {
        score += 1.0;
    }

    if factors.late_payments > 2 {
        score += 2.0;
    } else if factors.late_payments > 0 {
        score += 1.0;
    }

    if factors.pending_documents > 0 {
        score += 1.0;
    }

    if !factors.has_guarantor {
        score += 0.5;
    }
    if !factors.has_collateral {
        score += 0.5;
    }

    if score < 2.0 {
        RiskRating::Low
    } else if score < 4.0 {
        RiskRating::Medium
    } else {
        RiskRating::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> RiskFactors {
        RiskFactors {
            amount: 100_000,
            annual_rate_percent: 10.0,
            tenure_months: 12,
            late_payments: 0,
            pending_documents: 0,
            has_guarantor: true,
            has_collateral: true,
        }
    }

    #[test]
    fn small_secured_punctual_loan_is_low_risk() {
        assert_eq!(calculate_risk_rating(&baseline()), RiskRating::Low);
    }

    #[test]
    fn unsecured_baseline_is_still_low() {
        // No guarantor + no collateral alone scores 1.0, below the Medium band.
        let factors = RiskFactors {
            has_guarantor: false,
            has_collateral: false,
            ..baseline()
        };
        assert_eq!(calculate_risk_rating(&factors), RiskRating::Low);
    }

    #[test]
    fn large_amount_and_lateness_push_to_medium() {
        let factors = RiskFactors {
            amount: 600_000,
            late_payments: 1,
            ..baseline()
        };
        // 1.0 (amount) + 1.0 (lateness) = 2.0 → Medium.
        assert_eq!(calculate_risk_rating(&factors), RiskRating::Medium);
    }

    #[test]
    fn everything_wrong_is_high() {
        let factors = RiskFactors {
            amount: 2_000_000,
            annual_rate_percent: 15.0,
            tenure_months: 72,
            late_payments: 5,
            pending_documents: 3,
            has_guarantor: false,
            has_collateral: false,
        };
        assert_eq!(calculate_risk_rating(&factors), RiskRating::High);
    }

    #[test]
    fn repeated_lateness_outweighs_single_lateness() {
        let once = RiskFactors { late_payments: 1, amount: 600_000, ..baseline() };
        let chronic = RiskFactors { late_payments: 3, amount: 600_000, pending_documents: 1, ..baseline() };
        assert_eq!(calculate_risk_rating(&once), RiskRating::Medium);
        assert_eq!(calculate_risk_rating(&chronic), RiskRating::High);
    }
}
