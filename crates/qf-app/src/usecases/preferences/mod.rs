mod update;

pub use update::{UpdatePreferences, UpdatePreferencesError};
