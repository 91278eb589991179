use async_trait::async_trait;

use super::GatewayError;
use crate::entitlement::EntitlementUpdate;
use crate::ids::UserId;
use crate::user::UserProfile;

#[async_trait]
pub trait UserProfileRepositoryPort: Send + Sync {
    async fn insert_user_profile(&self, profile: &UserProfile) -> Result<(), GatewayError>;

    async fn fetch_user_profile(&self, user_id: &UserId) -> Result<UserProfile, GatewayError>;

    /// Write back the subscription fields after a purchase or restore.
    async fn update_subscription(
        &self,
        user_id: &UserId,
        update: &EntitlementUpdate,
    ) -> Result<(), GatewayError>;
}
