mod file_slot;

pub use file_slot::{default_slot_path, FileWidgetSlot, DEFAULT_WIDGET_SLOT_FILE};
