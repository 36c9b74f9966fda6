//! Request DTOs that differ from the service-layer request types.
//!
//! Most handlers deserialize the service request types directly; the DTOs
//! here exist where the HTTP shape diverges (e.g. no file bytes in the JSON
//! bill upload) or where the query string needs its own struct.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use munim_banking::AccountStatus;
use munim_core::Money;
use munim_projects::ProjectId;
use munim_vendors::VendorId;

#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    pub status: Option<AccountStatus>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountQuery {
    /// Hard-delete instead of the default soft deactivation.
    #[serde(default)]
    pub hard: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    pub vendor_id: Option<VendorId>,
}

/// JSON bill upload. File attachments go through the file-storage channel,
/// not this endpoint; `file_url` ends up unset.
#[derive(Debug, Deserialize)]
pub struct UploadBillRequest {
    pub vendor_id: VendorId,
    pub bill_no: String,
    pub bill_date: DateTime<Utc>,
    pub amount: Money,
    pub project_id: Option<ProjectId>,
}

#[derive(Debug, Deserialize)]
pub struct RecordAdvanceRequest {
    pub amount: Money,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LoanPaymentRequest {
    pub amount: Money,
}
