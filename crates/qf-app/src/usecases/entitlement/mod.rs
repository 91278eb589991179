mod apply_update;
mod check;

pub use apply_update::ApplyEntitlementUpdate;
pub use check::{CheckEntitlement, EntitlementStatus};
