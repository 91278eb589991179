//! Entitlement evaluation
//!
//! Premium status is a pure function of `(subscription_status, trial_end_date, now)`.
//! Callers evaluate it at every gating point instead of caching the result, since
//! `now` moves on independently of any data change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::{SubscriptionStatus, UserProfile};

/// Whether the profile is entitled to premium access at `now`.
///
/// Any non-free status counts as premium, including a paid plan whose
/// `subscription_end_date` is already in the past.
pub fn is_premium(profile: &UserProfile, now: DateTime<Utc>) -> bool {
    evaluate(profile.subscription_status, profile.trial_end_date, now)
}

/// Status-level form of [`is_premium`].
///
/// A trial that ends exactly at `now` is already over.
pub fn evaluate(
    status: SubscriptionStatus,
    trial_end_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    if !status.is_free() {
        return true;
    }
    matches!(trial_end_date, Some(end) if end > now)
}

/// Subscription state reported by the store integration after a purchase or restore.
///
/// 购买或恢复购买完成后回写到 profile 的订阅信息。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementUpdate {
    pub subscription_status: SubscriptionStatus,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
}

impl EntitlementUpdate {
    pub fn apply_to(&self, profile: &mut UserProfile) {
        profile.subscription_status = self.subscription_status;
        profile.trial_end_date = self.trial_end_date;
        profile.subscription_start_date = self.subscription_start_date;
        profile.subscription_end_date = self.subscription_end_date;
    }
}
