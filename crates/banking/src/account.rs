use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use munim_core::{DomainError, DomainResult, Entity, Money, TenantId, define_id};

define_id!(
    /// Bank account identifier.
    BankAccountId
);

/// Supported banks (fixed enumeration; determines the account-code prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankName {
    StateBankOfIndia,
    Hdfc,
    Icici,
    Axis,
    Kotak,
    PunjabNationalBank,
    BankOfBaroda,
    Canara,
    UnionBank,
    IdfcFirst,
}

impl BankName {
    /// Short prefix used in generated account codes.
    pub fn code(self) -> &'static str {
        match self {
            BankName::StateBankOfIndia => "SBI",
            BankName::Hdfc => "HDF",
            BankName::Icici => "ICI",
            BankName::Axis => "AXS",
            BankName::Kotak => "KTK",
            BankName::PunjabNationalBank => "PNB",
            BankName::BankOfBaroda => "BOB",
            BankName::Canara => "CNB",
            BankName::UnionBank => "UBI",
            BankName::IdfcFirst => "IDF",
        }
    }
}

/// Account type (fixed enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Current,
    Savings,
    FixedDeposit,
    RecurringDeposit,
    Nre,
    Nro,
    CashCredit,
    Overdraft,
}

impl AccountType {
    pub fn code(self) -> &'static str {
        match self {
            AccountType::Current => "CUR",
            AccountType::Savings => "SAV",
            AccountType::FixedDeposit => "FDA",
            AccountType::RecurringDeposit => "RDA",
            AccountType::Nre => "NRE",
            AccountType::Nro => "NRO",
            AccountType::CashCredit => "CCA",
            AccountType::Overdraft => "ODA",
        }
    }

    /// Only these account types may carry a non-zero interest rate.
    pub fn is_interest_bearing(self) -> bool {
        matches!(
            self,
            AccountType::Savings
                | AccountType::FixedDeposit
                | AccountType::RecurringDeposit
                | AccountType::Nre
                | AccountType::Nro
        )
    }
}

/// Account lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Dormant,
    Frozen,
}

/// Validated IFSC code (`^[A-Z]{4}0[A-Z0-9]{6}$`).
///
/// Deserialization goes through [`Ifsc::parse`], so a malformed code is
/// rejected at the boundary, not stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ifsc(String);

impl<'de> Deserialize<'de> for Ifsc {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ifsc::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl Ifsc {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let bytes = raw.as_bytes();
        let well_formed = bytes.len() == 11
            && bytes[..4].iter().all(u8::is_ascii_uppercase)
            && bytes[4] == b'0'
            && bytes[5..]
                .iter()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());

        if well_formed {
            Ok(Self(raw.to_string()))
        } else {
            Err(DomainError::validation(format!("invalid IFSC code: {raw}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Bank account document.
///
/// `PartialEq` only: `interest_rate` is an `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: BankAccountId,
    pub bank_name: BankName,
    pub account_type: AccountType,
    pub account_holder: String,
    pub bank_account_no: String,
    pub ifsc: Ifsc,
    pub branch_name: String,
    /// Generated code, unique per tenant (bank prefix + type prefix + suffix).
    pub account_code: String,
    /// Denormalized: must equal the signed sum of this account's entries.
    pub current_balance: Money,
    pub status: AccountStatus,
    /// Percent per annum; zero unless the type is interest-bearing.
    pub interest_rate: f64,
    pub tenant_id: TenantId,
    pub created_at: DateTime<Utc>,
}

impl Entity for BankAccount {
    type Id = BankAccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Validated request to open a bank account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBankAccount {
    pub bank_name: BankName,
    pub account_type: AccountType,
    pub account_holder: String,
    pub bank_account_no: String,
    pub ifsc: Ifsc,
    pub branch_name: String,
    pub interest_rate: f64,
}

impl NewBankAccount {
    pub fn validate(&self) -> DomainResult<()> {
        if self.account_holder.trim().is_empty() {
            return Err(DomainError::validation("account holder is required"));
        }
        if self.bank_account_no.trim().is_empty() {
            return Err(DomainError::validation("bank account number is required"));
        }
        if self.interest_rate < 0.0 {
            return Err(DomainError::validation("interest rate cannot be negative"));
        }
        if self.interest_rate > 0.0 && !self.account_type.is_interest_bearing() {
            return Err(DomainError::validation(
                "interest rate is only valid for savings/deposit/NRE/NRO accounts",
            ));
        }
        Ok(())
    }

    /// Materialize the account with a freshly generated code.
    ///
    /// Code uniqueness is probabilistic (time-based suffix); the store layer
    /// retries on collision.
    pub fn into_account(self, tenant_id: TenantId, now: DateTime<Utc>) -> BankAccount {
        let account_code = generate_account_code(self.bank_name, self.account_type, now);
        BankAccount {
            id: BankAccountId::new(),
            bank_name: self.bank_name,
            account_type: self.account_type,
            account_holder: self.account_holder,
            bank_account_no: self.bank_account_no,
            ifsc: self.ifsc,
            branch_name: self.branch_name,
            account_code,
            current_balance: 0,
            status: AccountStatus::Active,
            interest_rate: if self.account_type.is_interest_bearing() {
                self.interest_rate
            } else {
                0.0
            },
            tenant_id,
            created_at: now,
        }
    }
}

/// Generate an account code: bank prefix + type prefix + time-based suffix.
pub fn generate_account_code(
    bank: BankName,
    account_type: AccountType,
    now: DateTime<Utc>,
) -> String {
    let suffix = now.timestamp_millis().rem_euclid(1_000_000_000);
    format!("{}{}{:09}", bank.code(), account_type.code(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account() -> NewBankAccount {
        NewBankAccount {
            bank_name: BankName::Hdfc,
            account_type: AccountType::Current,
            account_holder: "Sharma Traders".to_string(),
            bank_account_no: "50200012345678".to_string(),
            ifsc: Ifsc::parse("HDFC0001234").unwrap(),
            branch_name: "MG Road".to_string(),
            interest_rate: 0.0,
        }
    }

    #[test]
    fn valid_ifsc_is_accepted() {
        for raw in ["HDFC0001234", "SBIN0000456", "ICIC0ABCD12"] {
            assert!(Ifsc::parse(raw).is_ok(), "{raw} should be valid");
        }
    }

    #[test]
    fn malformed_ifsc_is_rejected() {
        for raw in [
            "HDFC1001234", // fifth char must be '0'
            "HDF00001234", // only three letters
            "hdfc0001234", // lowercase
            "HDFC000123",  // too short
            "HDFC00012345",
            "HDFC000123!",
        ] {
            assert!(Ifsc::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn new_account_starts_at_zero_balance_and_active() {
        let account = new_account().into_account(TenantId::new(), Utc::now());
        assert_eq!(account.current_balance, 0);
        assert_eq!(account.status, AccountStatus::Active);
        assert!(account.account_code.starts_with("HDFCUR"));
    }

    #[test]
    fn interest_rate_rejected_for_non_interest_bearing_type() {
        let mut req = new_account();
        req.interest_rate = 4.5;
        let err = req.validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn interest_rate_kept_for_savings() {
        let mut req = new_account();
        req.account_type = AccountType::Savings;
        req.interest_rate = 3.5;
        req.validate().unwrap();
        let account = req.into_account(TenantId::new(), Utc::now());
        assert_eq!(account.interest_rate, 3.5);
        assert!(account.account_code.starts_with("HDFSAV"));
    }

    #[test]
    fn accounts_compare_by_value() {
        let mut req = new_account();
        req.account_type = AccountType::Savings;
        req.interest_rate = 3.5;
        let account = req.into_account(TenantId::new(), Utc::now());

        assert_eq!(account, account.clone());
        let mut other_rate = account.clone();
        other_rate.interest_rate = 4.0;
        assert_ne!(account, other_rate);
    }

    #[test]
    fn account_code_suffix_is_time_derived() {
        let at = Utc::now();
        let a = generate_account_code(BankName::Axis, AccountType::Savings, at);
        let b = generate_account_code(BankName::Axis, AccountType::Savings, at);
        // Same instant, same code: collisions are possible and handled by the
        // store's retry, not here.
        assert_eq!(a, b);
        assert_eq!(a.len(), 15);
    }
}
