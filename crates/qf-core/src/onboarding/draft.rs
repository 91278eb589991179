use std::collections::BTreeSet;

use chrono::{DateTime, NaiveTime, Utc};

use super::OnboardingStep;
use crate::entitlement::EntitlementUpdate;
use crate::ids::UserId;
use crate::quote::Category;
use crate::user::{Gender, UserPreferences, UserProfile, DEFAULT_NOTIFICATION_TIME};

/// Categories used when the user leaves the selection empty.
pub const DEFAULT_CATEGORIES: &[&str] = &["motivation", "wisdom", "love"];

/// Data collected during onboarding, not yet persisted.
///
/// 引导过程中收集、尚未写入远端的数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingDraft {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub goals: Vec<String>,
    pub categories: BTreeSet<Category>,
    pub notification_time: NaiveTime,
    pub notifications_enabled: bool,
    pub subscription: Option<EntitlementUpdate>,
}

impl Default for OnboardingDraft {
    fn default() -> Self {
        Self {
            name: None,
            gender: None,
            goals: Vec::new(),
            categories: BTreeSet::new(),
            notification_time: DEFAULT_NOTIFICATION_TIME,
            notifications_enabled: true,
            subscription: None,
        }
    }
}

impl OnboardingDraft {
    /// Empty whatever the given step collects.
    pub fn clear_step(&mut self, step: OnboardingStep) {
        match step {
            OnboardingStep::Name => {
                self.name = None;
                self.gender = None;
            }
            OnboardingStep::Goals => self.goals.clear(),
            OnboardingStep::Categories | OnboardingStep::Preferences => self.categories.clear(),
            OnboardingStep::NotificationPreferences => {
                self.notifications_enabled = false;
                self.notification_time = DEFAULT_NOTIFICATION_TIME;
            }
            OnboardingStep::SubscriptionIntro => self.subscription = None,
            OnboardingStep::Welcome | OnboardingStep::WidgetIntro | OnboardingStep::Completed => {}
        }
    }

    /// Selected categories, or [`DEFAULT_CATEGORIES`] when none were picked.
    pub fn effective_categories(&self) -> BTreeSet<Category> {
        if self.categories.is_empty() {
            DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
        } else {
            self.categories.clone()
        }
    }

    pub fn to_profile(&self, user_id: UserId, email: &str, now: DateTime<Utc>) -> UserProfile {
        let mut profile = UserProfile::new(user_id, email);
        profile.name = self
            .name
            .as_ref()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        profile.gender = self.gender;
        profile.goals = self.goals.clone();
        if let Some(update) = &self.subscription {
            update.apply_to(&mut profile);
        }
        profile.created_at = Some(now);
        profile.updated_at = Some(now);
        profile
    }

    pub fn to_preferences(&self, user_id: UserId) -> UserPreferences {
        UserPreferences {
            user_id,
            categories: self.effective_categories(),
            notification_time: self.notification_time,
            notifications_enabled: self.notifications_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::SubscriptionStatus;
    use chrono::TimeZone;

    #[test]
    fn test_effective_categories_fall_back_to_defaults() {
        let draft = OnboardingDraft::default();
        let categories = draft.effective_categories();
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
        assert!(categories.contains("wisdom"));
    }

    #[test]
    fn test_clear_name_step_drops_name_and_gender() {
        let mut draft = OnboardingDraft {
            name: Some("Lin".into()),
            gender: Some(Gender::Female),
            goals: vec!["calm".into()],
            ..Default::default()
        };

        draft.clear_step(OnboardingStep::Name);

        assert!(draft.name.is_none());
        assert!(draft.gender.is_none());
        assert_eq!(draft.goals, vec!["calm".to_string()]);
    }

    #[test]
    fn test_to_profile_carries_trial_from_subscription_step() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let draft = OnboardingDraft {
            name: Some("  ".into()),
            subscription: Some(EntitlementUpdate {
                subscription_status: SubscriptionStatus::Free,
                trial_end_date: Some(now + chrono::Duration::days(3)),
                subscription_start_date: None,
                subscription_end_date: None,
            }),
            ..Default::default()
        };

        let profile = draft.to_profile("u1".into(), "a@b.c", now);

        assert!(profile.name.is_none());
        assert_eq!(profile.trial_end_date, Some(now + chrono::Duration::days(3)));
        assert_eq!(profile.created_at, Some(now));
    }
}
