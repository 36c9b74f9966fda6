//! `munim-infra` — storage and application services for the ledger core.
//!
//! - [`store`]: tenant-scoped in-memory document store with all-or-nothing
//!   transactions.
//! - [`collaborators`]: contracts with excluded collaborators (file storage).
//! - [`services`]: one service per domain area, orchestrating validation,
//!   compound transactional writes, and fire-and-forget notifications.

pub mod collaborators;
pub mod services;
pub mod store;

#[cfg(test)]
mod integration_tests;

pub use collaborators::{FileStorage, FileStorageError, InMemoryFileStorage, StoredFile};
pub use services::banking::AccountUpdate;
pub use services::billing::{
    BillUpdate, FileUpload, PayBill, UploadBill, VendorPayment, VendorPaymentKind,
    VendorPaymentOutcome,
};
pub use services::projects::{NewProject, RecordProjectPayment};
pub use services::vendors::NewVendor;
pub use services::{
    BankingService, BillingService, LedgerService, LoanService, ProjectService, ServiceError,
    ServiceResult, VendorService,
};
pub use store::{MemoryStore, State, StoreError};
