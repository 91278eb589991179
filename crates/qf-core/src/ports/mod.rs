//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the infrastructure that
//! talks to the remote data service, the shared widget slot and the system clock.
//! Controllers receive them as injected `Arc<dyn Port>` collaborators so tests can
//! substitute fakes.

mod clock;
pub mod errors;
mod liked_quote_repository;
mod quote_repository;
mod user_preferences_repository;
mod user_profile_repository;
mod widget_slot;

pub use clock::ClockPort;
pub use errors::{GatewayError, WidgetSlotError};
pub use liked_quote_repository::LikedQuoteRepositoryPort;
pub use quote_repository::QuoteRepositoryPort;
pub use user_preferences_repository::UserPreferencesRepositoryPort;
pub use user_profile_repository::UserProfileRepositoryPort;
pub use widget_slot::WidgetSlotPort;
