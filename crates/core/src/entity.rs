//! Entity trait: identity + tenant ownership.

use crate::id::TenantId;

/// Entity marker + minimal interface.
///
/// Every persisted document implements this; the store uses `tenant_id()` to
/// enforce the partition-key invariant on each read and write.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the owning tenant.
    fn tenant_id(&self) -> TenantId;
}
