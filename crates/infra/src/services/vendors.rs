//! Vendor referents, advances, and the statement read-model.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use munim_core::{DomainError, Money, TenantId};
use munim_vendors::{
    AdvanceId, StatementKind, StatementLine, StatementSource, Vendor, VendorAdvance, VendorId,
    build_statement,
};

use crate::store::{MemoryStore, scoped, scoped_iter, scoped_mut};

use super::{ServiceError, ServiceResult};

/// Request to register a vendor.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewVendor {
    pub name: String,
    pub gst_no: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub bank_accounts: Vec<String>,
    #[serde(default)]
    pub payment_modes: Vec<String>,
}

#[derive(Clone)]
pub struct VendorService {
    store: Arc<MemoryStore>,
}

impl VendorService {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }

    pub fn create_vendor(&self, tenant_id: TenantId, request: NewVendor) -> ServiceResult<Vendor> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::Domain(DomainError::validation(
                "vendor name is required",
            )));
        }

        self.store.transact(|state| {
            let vendor = Vendor {
                id: VendorId::new(),
                name: request.name.clone(),
                gst_no: request.gst_no.clone(),
                phone: request.phone.clone(),
                address: request.address.clone(),
                bank_accounts: request.bank_accounts.clone(),
                payment_modes: request.payment_modes.clone(),
                tenant_id,
            };
            state.vendors.insert(vendor.id, vendor.clone());
            Ok(vendor)
        })
    }

    pub fn get_vendor(&self, tenant_id: TenantId, id: &VendorId) -> ServiceResult<Vendor> {
        self.store
            .read(|state| scoped(&state.vendors, tenant_id, id).cloned())?
            .ok_or_else(ServiceError::not_found)
    }

    pub fn list_vendors(&self, tenant_id: TenantId) -> ServiceResult<Vec<Vendor>> {
        let mut vendors = self.store.read(|state| {
            scoped_iter(&state.vendors, tenant_id)
                .cloned()
                .collect::<Vec<_>>()
        })?;
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vendors)
    }

    pub fn record_advance(
        &self,
        tenant_id: TenantId,
        vendor_id: &VendorId,
        amount: Money,
        date: DateTime<Utc>,
    ) -> ServiceResult<VendorAdvance> {
        self.store.transact(|state| {
            scoped(&state.vendors, tenant_id, vendor_id).ok_or_else(ServiceError::not_found)?;
            let advance = VendorAdvance::new(*vendor_id, amount, date, tenant_id)?;
            state.advances.insert(advance.id, advance.clone());
            Ok(advance)
        })
    }

    /// Mark an advance as cleared. A manual bookkeeping flag, not derived
    /// from bill matching.
    pub fn clear_advance(&self, tenant_id: TenantId, id: &AdvanceId) -> ServiceResult<VendorAdvance> {
        self.store.transact(|state| {
            let advance = scoped_mut(&mut state.advances, tenant_id, id)
                .ok_or_else(ServiceError::not_found)?;
            advance.cleared = true;
            Ok(advance.clone())
        })
    }

    pub fn list_advances(
        &self,
        tenant_id: TenantId,
        vendor_id: &VendorId,
    ) -> ServiceResult<Vec<VendorAdvance>> {
        let mut advances = self.store.read(|state| {
            scoped_iter(&state.advances, tenant_id)
                .filter(|a| a.vendor_id == *vendor_id)
                .cloned()
                .collect::<Vec<_>>()
        })?;
        advances.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(advances)
    }

    /// Chronological statement for one vendor: bills (credit), advances
    /// (debit), bill payments (debit), with a running balance. Recomputed on
    /// every request.
    pub fn statement(
        &self,
        tenant_id: TenantId,
        vendor_id: &VendorId,
    ) -> ServiceResult<Vec<StatementLine>> {
        let sources = self.store.read(|state| {
            scoped(&state.vendors, tenant_id, vendor_id)?;

            let mut sources = Vec::new();
            for bill in scoped_iter(&state.bills, tenant_id).filter(|b| b.vendor_id == *vendor_id) {
                sources.push(StatementSource {
                    date: bill.bill_date,
                    kind: StatementKind::Bill,
                    amount: bill.amount,
                    reference: format!("Bill {}", bill.bill_no),
                });
                for payment in &bill.payments {
                    sources.push(StatementSource {
                        date: payment.date,
                        kind: StatementKind::BillPayment,
                        amount: payment.amount,
                        reference: format!("Payment against bill {}", bill.bill_no),
                    });
                }
            }
            for advance in
                scoped_iter(&state.advances, tenant_id).filter(|a| a.vendor_id == *vendor_id)
            {
                sources.push(StatementSource {
                    date: advance.date,
                    kind: StatementKind::Advance,
                    amount: advance.amount,
                    reference: "Advance".to_string(),
                });
            }
            Some(sources)
        })?;

        match sources {
            Some(sources) => Ok(build_statement(sources)),
            None => Err(ServiceError::not_found()),
        }
    }
}
