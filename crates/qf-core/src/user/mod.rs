//! User profile and preference models

mod preferences;
mod profile;

pub use preferences::{PreferencesPatch, UserPreferences, DEFAULT_NOTIFICATION_TIME};
pub use profile::{Gender, SubscriptionStatus, UserProfile};
