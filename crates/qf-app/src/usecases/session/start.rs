//! Session start-up
//!
//! Brings a signed-in user from "credentials known" to "feed on screen":
//! profile, preferences, quote feed, liked set and the first widget hand-off.

use std::sync::Arc;

use qf_core::ports::{GatewayError, UserPreferencesRepositoryPort, UserProfileRepositoryPort};
use qf_core::{Quote, UserId, UserPreferences, UserProfile};
use tracing::{info, info_span, warn, Instrument};

use crate::usecases::feed::{FeedError, QuoteFeedController};
use crate::usecases::likes::LikeSynchronizer;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to load user profile: {0}")]
    Profile(#[source] GatewayError),

    #[error("failed to load user preferences: {0}")]
    Preferences(#[source] GatewayError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub profile: UserProfile,
    pub preferences: UserPreferences,
    pub feed_len: usize,
    pub premium: bool,
    pub liked_count: usize,
    /// False when the liked set could not be fetched; the session still starts.
    pub likes_synced: bool,
    pub first_quote: Option<Quote>,
}

pub struct StartSession {
    profiles: Arc<dyn UserProfileRepositoryPort>,
    preferences: Arc<dyn UserPreferencesRepositoryPort>,
    feed: Arc<QuoteFeedController>,
    likes: Arc<LikeSynchronizer>,
}

impl StartSession {
    pub fn new(
        profiles: Arc<dyn UserProfileRepositoryPort>,
        preferences: Arc<dyn UserPreferencesRepositoryPort>,
        feed: Arc<QuoteFeedController>,
        likes: Arc<LikeSynchronizer>,
    ) -> Self {
        Self {
            profiles,
            preferences,
            feed,
            likes,
        }
    }

    pub async fn execute(&self, user_id: &UserId) -> Result<SessionSummary, SessionError> {
        let span = info_span!("usecase.session.start", user_id = %user_id);
        async {
            let profile = self
                .profiles
                .fetch_user_profile(user_id)
                .await
                .map_err(SessionError::Profile)?;
            let preferences = self
                .preferences
                .fetch_user_preferences(user_id)
                .await
                .map_err(SessionError::Preferences)?;

            // The profile only replaces the current one once the feed is in.
            let feed_len = self.feed.load_feed(&preferences.categories).await?;
            self.feed.set_profile(Some(profile.clone()));

            let likes_synced = match self.likes.fetch_all(Some(user_id)).await {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %err, "liked quotes unavailable, continuing without them");
                    false
                }
            };

            let first_quote = self.feed.mark_visible();
            let summary = SessionSummary {
                premium: self.feed.is_premium(),
                liked_count: self.likes.liked_ids().len(),
                profile,
                preferences,
                feed_len,
                likes_synced,
                first_quote,
            };

            info!(
                feed_len,
                premium = summary.premium,
                liked = summary.liked_count,
                "session started"
            );
            Ok(summary)
        }
        .instrument(span)
        .await
    }
}
