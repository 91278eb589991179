pub mod entitlement;
pub mod feed;
pub mod likes;
pub mod onboarding;
pub mod preferences;
pub mod session;
pub mod widget;

pub use entitlement::{ApplyEntitlementUpdate, CheckEntitlement, EntitlementStatus};
pub use feed::{FeedAdvance, FeedError, QuoteFeedController};
pub use likes::{BulkUnlikeReport, LikeSyncError, LikeSynchronizer};
pub use onboarding::{CommitError, CommitPhase, CommittedOnboarding, OnboardingFlowController};
pub use preferences::{UpdatePreferences, UpdatePreferencesError};
pub use session::{SessionError, SessionSummary, StartSession};
pub use widget::WidgetBridge;
