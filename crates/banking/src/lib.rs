//! `munim-banking` — bank account domain types.
//!
//! A [`BankAccount`] carries a denormalized `current_balance` that must always
//! equal the signed sum of the account's transaction lines; the balance is
//! only ever mutated transactionally alongside entry writes (see
//! `munim-infra`). This crate holds the pure parts: enumerations, IFSC
//! validation, account-code generation, and read-side statistics.

pub mod account;
pub mod stats;

pub use account::{
    AccountStatus, AccountType, BankAccount, BankAccountId, BankName, Ifsc, NewBankAccount,
    generate_account_code,
};
pub use stats::{AccountStats, compute_stats};
