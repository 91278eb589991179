//! Widget hand-off
//!
//! One-way, best-effort transfer of the quote currently on screen into the
//! slot read by the home-screen widget.

use std::sync::Arc;

use qf_core::ports::{WidgetSlotError, WidgetSlotPort};
use qf_core::Quote;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct WidgetBridge {
    slot: Arc<dyn WidgetSlotPort>,
}

impl WidgetBridge {
    pub fn new(slot: Arc<dyn WidgetSlotPort>) -> Self {
        Self { slot }
    }

    /// Overwrite the shared slot with `quote`.
    pub fn publish(&self, quote: &Quote) -> Result<(), WidgetSlotError> {
        self.slot.write(quote)?;
        debug!(quote_id = %quote.id, "widget slot updated");
        Ok(())
    }

    /// Publish, logging instead of failing. Feed navigation never waits on the widget.
    pub fn publish_best_effort(&self, quote: &Quote) {
        if let Err(err) = self.publish(quote) {
            warn!(quote_id = %quote.id, error = %err, "failed to publish quote to widget slot");
        }
    }

    /// Current slot contents, `None` when absent or unreadable.
    pub fn read(&self) -> Option<Quote> {
        self.slot.read()
    }
}
