use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::quote::Category;

/// 09:00 local time.
pub const DEFAULT_NOTIFICATION_TIME: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(t) => t,
    None => NaiveTime::MIN,
};

/// Per-user feed and notification preferences.
///
/// 用户偏好：分类、每日提醒时间、是否开启提醒。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: UserId,
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    pub notification_time: NaiveTime,
    pub notifications_enabled: bool,
}

impl UserPreferences {
    pub fn new(user_id: UserId, categories: BTreeSet<Category>) -> Self {
        Self {
            user_id,
            categories,
            notification_time: DEFAULT_NOTIFICATION_TIME,
            notifications_enabled: true,
        }
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &PreferencesPatch) {
        if let Some(categories) = &patch.categories {
            self.categories = categories.clone();
        }
        if let Some(time) = patch.notification_time {
            self.notification_time = time;
        }
        if let Some(enabled) = patch.notifications_enabled {
            self.notifications_enabled = enabled;
        }
    }
}

/// Partial preference update. Absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeSet<Category>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications_enabled: Option<bool>,
}

impl PreferencesPatch {
    pub fn is_empty(&self) -> bool {
        self.categories.is_none()
            && self.notification_time.is_none()
            && self.notifications_enabled.is_none()
    }
}
