//! # qf-core
//!
//! Core domain models and business logic for QuoteFeed.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod config;
pub mod entitlement;
pub mod ids;
pub mod onboarding;
pub mod ports;
pub mod quote;
pub mod user;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use entitlement::{is_premium, EntitlementUpdate};
pub use ids::{QuoteId, UserId};
pub use quote::{Category, Quote};
pub use user::{PreferencesPatch, SubscriptionStatus, UserPreferences, UserProfile};

/// Feed positions visible to a non-premium user before the upsell.
pub const FREE_TIER_QUOTA: usize = 10;
