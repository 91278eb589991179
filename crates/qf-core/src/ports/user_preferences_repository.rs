use async_trait::async_trait;

use super::GatewayError;
use crate::ids::UserId;
use crate::user::{PreferencesPatch, UserPreferences};

#[async_trait]
pub trait UserPreferencesRepositoryPort: Send + Sync {
    async fn insert_user_preferences(&self, preferences: &UserPreferences) -> Result<(), GatewayError>;

    async fn fetch_user_preferences(&self, user_id: &UserId) -> Result<UserPreferences, GatewayError>;

    async fn update_user_preferences(
        &self,
        user_id: &UserId,
        patch: &PreferencesPatch,
    ) -> Result<(), GatewayError>;
}
