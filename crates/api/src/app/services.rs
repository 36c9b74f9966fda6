//! Wiring of the application services over shared infrastructure.

use std::sync::Arc;

use munim_events::{NoopNotifier, Notifier};
use munim_infra::{
    BankingService, BillingService, FileStorage, InMemoryFileStorage, LedgerService, LoanService,
    MemoryStore, ProjectService, VendorService,
};

/// All domain services, sharing one store.
pub struct AppServices {
    pub banking: BankingService,
    pub ledger: LedgerService,
    pub billing: BillingService,
    pub vendors: VendorService,
    pub projects: ProjectService,
    pub loans: LoanService,
}

/// Default wiring: in-memory store and file storage, no notification
/// listeners. Production deployments swap the collaborators here.
pub fn build_services() -> AppServices {
    let files: Arc<dyn FileStorage> = Arc::new(InMemoryFileStorage::new());
    let notifier: Arc<dyn Notifier> = Arc::new(NoopNotifier);
    wire(Arc::new(MemoryStore::new()), files, notifier)
}

pub fn wire(
    store: Arc<MemoryStore>,
    files: Arc<dyn FileStorage>,
    notifier: Arc<dyn Notifier>,
) -> AppServices {
    AppServices {
        banking: BankingService::new(store.clone()),
        ledger: LedgerService::new(store.clone()),
        billing: BillingService::new(store.clone(), files, notifier.clone()),
        vendors: VendorService::new(store.clone()),
        projects: ProjectService::new(store.clone(), notifier.clone()),
        loans: LoanService::new(store, notifier),
    }
}
