use async_trait::async_trait;

use super::GatewayError;
use crate::ids::{QuoteId, UserId};

/// Remote liked-quote records, one row per `(user, quote)` pair.
#[async_trait]
pub trait LikedQuoteRepositoryPort: Send + Sync {
    async fn fetch_liked_quote_ids(&self, user_id: &UserId) -> Result<Vec<QuoteId>, GatewayError>;

    async fn like_quote(&self, quote_id: &QuoteId, user_id: &UserId) -> Result<(), GatewayError>;

    async fn unlike_quote(&self, quote_id: &QuoteId, user_id: &UserId) -> Result<(), GatewayError>;
}
