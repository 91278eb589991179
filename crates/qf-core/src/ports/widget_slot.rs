use super::WidgetSlotError;
use crate::quote::Quote;

/// Single-value durable slot shared with the out-of-process widget.
///
/// Writes are synchronous, idempotent overwrites. Reads never fail: an absent or
/// undecodable slot reads as `None`.
pub trait WidgetSlotPort: Send + Sync {
    fn write(&self, quote: &Quote) -> Result<(), WidgetSlotError>;

    fn read(&self) -> Option<Quote>;
}

