//! File-backed widget slot
//!
//! The widget runs in another process and only reads a single JSON file from a
//! shared directory. Writes go through a temp file and a rename so the reader
//! sees either the previous quote or the new one, never a torn write.

use std::fs;
use std::path::{Path, PathBuf};

use qf_core::ports::{WidgetSlotError, WidgetSlotPort};
use qf_core::Quote;
use tracing::{debug, warn};

pub const DEFAULT_WIDGET_SLOT_FILE: &str = "widget_quote.json";

/// `<data_dir>/quotefeed/widget_quote.json`, if the platform has a data dir.
pub fn default_slot_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("quotefeed").join(DEFAULT_WIDGET_SLOT_FILE))
}

pub struct FileWidgetSlot {
    path: PathBuf,
}

impl FileWidgetSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot file named [`DEFAULT_WIDGET_SLOT_FILE`] inside `base_dir`.
    pub fn with_defaults(base_dir: PathBuf) -> Self {
        Self {
            path: base_dir.join(DEFAULT_WIDGET_SLOT_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn atomic_write(&self, content: &str) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)
    }
}

impl WidgetSlotPort for FileWidgetSlot {
    fn write(&self, quote: &Quote) -> Result<(), WidgetSlotError> {
        let json =
            serde_json::to_string_pretty(quote).map_err(|e| WidgetSlotError::Encode(e.to_string()))?;
        self.atomic_write(&json)?;
        debug!(path = %self.path.display(), quote_id = %quote.id, "widget slot written");
        Ok(())
    }

    fn read(&self) -> Option<Quote> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read widget slot");
                return None;
            }
        };

        if content.trim().is_empty() {
            return None;
        }

        match serde_json::from_str(&content) {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "widget slot holds an undecodable quote");
                None
            }
        }
    }
}
