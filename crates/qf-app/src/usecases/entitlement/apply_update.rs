use std::sync::Arc;

use anyhow::{Context, Result};
use qf_core::ports::UserProfileRepositoryPort;
use qf_core::{EntitlementUpdate, UserId, UserProfile};
use tracing::{info, info_span, Instrument};

/// Use case for writing a purchase/restore result back to the remote profile.
///
/// The entitlement evaluator only sees the new subscription after this has
/// succeeded and the returned profile has been installed by the caller.
pub struct ApplyEntitlementUpdate {
    profiles: Arc<dyn UserProfileRepositoryPort>,
}

impl ApplyEntitlementUpdate {
    pub fn new(profiles: Arc<dyn UserProfileRepositoryPort>) -> Self {
        Self { profiles }
    }

    /// Write the update, then re-read the profile so callers get the stored row.
    pub async fn execute(&self, user_id: &UserId, update: &EntitlementUpdate) -> Result<UserProfile> {
        let span = info_span!(
            "usecase.apply_entitlement_update.execute",
            user_id = %user_id,
            status = %update.subscription_status
        );
        async {
            self.profiles
                .update_subscription(user_id, update)
                .await
                .context("write subscription to profile failed")?;
            let profile = self
                .profiles
                .fetch_user_profile(user_id)
                .await
                .context("re-fetch profile after subscription update failed")?;
            info!("subscription written back to profile");
            Ok(profile)
        }
        .instrument(span)
        .await
    }
}
