use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use munim_core::{DomainError, DomainResult, Entity, Money, TenantId, define_id};

define_id!(
    /// Vendor identifier.
    VendorId
);

define_id!(
    /// Vendor advance identifier.
    AdvanceId
);

/// Vendor document. Read-only referent for bills and advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub gst_no: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Free-form bank account references supplied by the vendor.
    pub bank_accounts: Vec<String>,
    pub payment_modes: Vec<String>,
    pub tenant_id: TenantId,
}

impl Entity for Vendor {
    type Id = VendorId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// A prepayment to a vendor.
///
/// `cleared` is a manual bookkeeping flag, not derived from bill matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorAdvance {
    pub id: AdvanceId,
    pub vendor_id: VendorId,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub cleared: bool,
    pub tenant_id: TenantId,
}

impl VendorAdvance {
    pub fn new(
        vendor_id: VendorId,
        amount: Money,
        date: DateTime<Utc>,
        tenant_id: TenantId,
    ) -> DomainResult<Self> {
        if amount <= 0 {
            return Err(DomainError::validation("advance amount must be positive"));
        }
        Ok(Self {
            id: AdvanceId::new(),
            vendor_id,
            amount,
            date,
            cleared: false,
            tenant_id,
        })
    }
}

impl Entity for VendorAdvance {
    type Id = AdvanceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}
