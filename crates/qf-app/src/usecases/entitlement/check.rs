use std::sync::Arc;

use anyhow::{Context, Result};
use qf_core::entitlement::is_premium;
use qf_core::ports::{ClockPort, UserProfileRepositoryPort};
use qf_core::{SubscriptionStatus, UserId, UserProfile};
use tracing::{info_span, Instrument};

/// Entitlement as evaluated at a single instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitlementStatus {
    pub premium: bool,
    pub subscription_status: SubscriptionStatus,
    pub profile: UserProfile,
}

/// Use case for evaluating a user's premium status against the current time.
pub struct CheckEntitlement {
    profiles: Arc<dyn UserProfileRepositoryPort>,
    clock: Arc<dyn ClockPort>,
}

impl CheckEntitlement {
    pub fn new(profiles: Arc<dyn UserProfileRepositoryPort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { profiles, clock }
    }

    pub async fn execute(&self, user_id: &UserId) -> Result<EntitlementStatus> {
        let span = info_span!("usecase.check_entitlement.execute", user_id = %user_id);
        async {
            let profile = self
                .profiles
                .fetch_user_profile(user_id)
                .await
                .with_context(|| format!("fetch profile for {user_id} failed"))?;
            let premium = is_premium(&profile, self.clock.now());
            Ok(EntitlementStatus {
                premium,
                subscription_status: profile.subscription_status,
                profile,
            })
        }
        .instrument(span)
        .await
    }
}
