//! Use case for updating user preferences
//! 更新用户偏好的用例

use std::sync::Arc;

use qf_core::ports::{GatewayError, UserPreferencesRepositoryPort};
use qf_core::{PreferencesPatch, UserId};
use tracing::{debug, info, info_span, Instrument};

#[derive(Debug, thiserror::Error)]
pub enum UpdatePreferencesError {
    #[error("at least one category must stay selected")]
    EmptyCategories,

    #[error("failed to update preferences: {0}")]
    Remote(#[from] GatewayError),
}

/// Forwards a partial preference update to the remote store.
pub struct UpdatePreferences {
    preferences: Arc<dyn UserPreferencesRepositoryPort>,
}

impl UpdatePreferences {
    pub fn new(preferences: Arc<dyn UserPreferencesRepositoryPort>) -> Self {
        Self { preferences }
    }

    /// An empty patch is a no-op. An explicitly empty category set is rejected,
    /// since the feed cannot be queried without categories.
    pub async fn execute(
        &self,
        user_id: &UserId,
        patch: &PreferencesPatch,
    ) -> Result<(), UpdatePreferencesError> {
        if patch.is_empty() {
            debug!("preferences patch is empty, nothing to update");
            return Ok(());
        }
        if patch.categories.as_ref().is_some_and(|c| c.is_empty()) {
            return Err(UpdatePreferencesError::EmptyCategories);
        }

        let span = info_span!("usecase.update_preferences.execute", user_id = %user_id);
        async {
            self.preferences.update_user_preferences(user_id, patch).await?;
            info!(
                categories = patch.categories.is_some(),
                notification_time = ?patch.notification_time,
                notifications_enabled = ?patch.notifications_enabled,
                "preferences updated"
            );
            Ok(())
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use qf_core::UserPreferences;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockPreferences {
        patches: Mutex<Vec<PreferencesPatch>>,
    }

    #[async_trait]
    impl UserPreferencesRepositoryPort for MockPreferences {
        async fn insert_user_preferences(&self, _preferences: &UserPreferences) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn fetch_user_preferences(&self, _user_id: &UserId) -> Result<UserPreferences, GatewayError> {
            Err(GatewayError::NotFound)
        }

        async fn update_user_preferences(
            &self,
            _user_id: &UserId,
            patch: &PreferencesPatch,
        ) -> Result<(), GatewayError> {
            self.patches.lock().unwrap().push(patch.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_patch_is_forwarded() {
        let repo = Arc::new(MockPreferences::default());
        let patch = PreferencesPatch {
            notifications_enabled: Some(false),
            ..Default::default()
        };

        UpdatePreferences::new(repo.clone())
            .execute(&"u1".into(), &patch)
            .await
            .unwrap();

        assert_eq!(repo.patches.lock().unwrap().as_slice(), &[patch]);
    }

    #[tokio::test]
    async fn test_empty_categories_rejected_before_remote() {
        let repo = Arc::new(MockPreferences::default());
        let patch = PreferencesPatch {
            categories: Some(BTreeSet::new()),
            ..Default::default()
        };

        let err = UpdatePreferences::new(repo.clone())
            .execute(&"u1".into(), &patch)
            .await
            .unwrap_err();

        assert!(matches!(err, UpdatePreferencesError::EmptyCategories));
        assert!(repo.patches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_patch_is_noop() {
        let repo = Arc::new(MockPreferences::default());

        UpdatePreferences::new(repo.clone())
            .execute(&"u1".into(), &PreferencesPatch::default())
            .await
            .unwrap();

        assert!(repo.patches.lock().unwrap().is_empty());
    }
}
