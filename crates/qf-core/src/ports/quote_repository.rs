use std::collections::BTreeSet;

use async_trait::async_trait;

use super::GatewayError;
use crate::quote::{Category, Quote};

#[async_trait]
pub trait QuoteRepositoryPort: Send + Sync {
    /// Fetch quotes tagged with any of `categories`, in the order the store returns them.
    async fn fetch_quotes(&self, categories: &BTreeSet<Category>) -> Result<Vec<Quote>, GatewayError>;
}
