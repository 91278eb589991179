//! HTTP gateway for the hosted quote database.
//!
//! Implements every remote port over a PostgREST-style REST API. Each call is a
//! single request; nothing is cached or retried here.

use std::collections::BTreeSet;

use async_trait::async_trait;
use qf_core::ports::{
    GatewayError, LikedQuoteRepositoryPort, QuoteRepositoryPort, UserPreferencesRepositoryPort,
    UserProfileRepositoryPort,
};
use qf_core::{
    Category, EntitlementUpdate, PreferencesPatch, Quote, QuoteId, UserId, UserPreferences,
    UserProfile,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::config::RestGatewayConfig;
use super::rows::{array_literal, LikedQuoteIdRow, LikedQuoteRow};

const QUOTES: &str = "quotes";
const LIKED_QUOTES: &str = "liked_quotes";
const USER_PROFILES: &str = "user_profiles";
const USER_PREFERENCES: &str = "user_preferences";

const RETURN_MINIMAL: &str = "return=minimal";
const RETURN_REPRESENTATION: &str = "return=representation";

pub struct RestDataGateway {
    client: reqwest::Client,
    rest_root: String,
    api_key: String,
}

impl RestDataGateway {
    pub fn new(config: RestGatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            rest_root: config.rest_root(),
            api_key: config.api_key,
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_root, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(builder: RequestBuilder) -> Result<Response, GatewayError> {
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            code: status.as_u16(),
            message,
        })
    }

    async fn fetch_rows<T: DeserializeOwned>(builder: RequestBuilder) -> Result<Vec<T>, GatewayError> {
        let response = Self::send(builder).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Single-row lookup. PostgREST answers a miss with `[]`, not 404.
    async fn fetch_one<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, GatewayError> {
        Self::fetch_rows(builder)
            .await?
            .into_iter()
            .next()
            .ok_or(GatewayError::NotFound)
    }

    /// PATCH that must touch at least one row.
    async fn patch_existing(builder: RequestBuilder) -> Result<(), GatewayError> {
        let rows: Vec<serde_json::Value> =
            Self::fetch_rows(builder.header("Prefer", RETURN_REPRESENTATION)).await?;
        if rows.is_empty() {
            return Err(GatewayError::NotFound);
        }
        Ok(())
    }
}

fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Network(format!("request timed out: {error}"))
    } else if error.is_decode() {
        GatewayError::Decode(error.to_string())
    } else {
        GatewayError::Network(error.to_string())
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl QuoteRepositoryPort for RestDataGateway {
    async fn fetch_quotes(&self, categories: &BTreeSet<Category>) -> Result<Vec<Quote>, GatewayError> {
        let filter = format!("ov.{}", array_literal(categories));
        debug!(filter = %filter, "fetching quotes");

        Self::fetch_rows(
            self.request(Method::GET, QUOTES)
                .query(&[("select", "*"), ("categories", filter.as_str())]),
        )
        .await
    }
}

#[async_trait]
impl LikedQuoteRepositoryPort for RestDataGateway {
    async fn fetch_liked_quote_ids(&self, user_id: &UserId) -> Result<Vec<QuoteId>, GatewayError> {
        let rows: Vec<LikedQuoteIdRow> = Self::fetch_rows(
            self.request(Method::GET, LIKED_QUOTES)
                .query(&[("select", "quote_id".to_string()), ("user_id", eq(user_id.as_str()))]),
        )
        .await?;
        Ok(rows.into_iter().map(|row| row.quote_id).collect())
    }

    async fn like_quote(&self, quote_id: &QuoteId, user_id: &UserId) -> Result<(), GatewayError> {
        // Liking twice is not an error.
        Self::send(
            self.request(Method::POST, LIKED_QUOTES)
                .query(&[("on_conflict", "user_id,quote_id")])
                .header("Prefer", format!("resolution=ignore-duplicates,{RETURN_MINIMAL}"))
                .json(&LikedQuoteRow { user_id, quote_id }),
        )
        .await?;
        debug!(quote_id = %quote_id, "like recorded");
        Ok(())
    }

    async fn unlike_quote(&self, quote_id: &QuoteId, user_id: &UserId) -> Result<(), GatewayError> {
        Self::send(self.request(Method::DELETE, LIKED_QUOTES).query(&[
            ("user_id", eq(user_id.as_str())),
            ("quote_id", eq(quote_id.as_str())),
        ]))
        .await?;
        debug!(quote_id = %quote_id, "like removed");
        Ok(())
    }
}

#[async_trait]
impl UserProfileRepositoryPort for RestDataGateway {
    async fn insert_user_profile(&self, profile: &UserProfile) -> Result<(), GatewayError> {
        Self::send(
            self.request(Method::POST, USER_PROFILES)
                .header("Prefer", RETURN_MINIMAL)
                .json(profile),
        )
        .await?;
        Ok(())
    }

    async fn fetch_user_profile(&self, user_id: &UserId) -> Result<UserProfile, GatewayError> {
        Self::fetch_one(
            self.request(Method::GET, USER_PROFILES)
                .query(&[("select", "*".to_string()), ("id", eq(user_id.as_str()))]),
        )
        .await
    }

    async fn update_subscription(
        &self,
        user_id: &UserId,
        update: &EntitlementUpdate,
    ) -> Result<(), GatewayError> {
        Self::patch_existing(
            self.request(Method::PATCH, USER_PROFILES)
                .query(&[("id", eq(user_id.as_str()))])
                .json(update),
        )
        .await
    }
}

#[async_trait]
impl UserPreferencesRepositoryPort for RestDataGateway {
    async fn insert_user_preferences(&self, preferences: &UserPreferences) -> Result<(), GatewayError> {
        Self::send(
            self.request(Method::POST, USER_PREFERENCES)
                .header("Prefer", RETURN_MINIMAL)
                .json(preferences),
        )
        .await?;
        Ok(())
    }

    async fn fetch_user_preferences(&self, user_id: &UserId) -> Result<UserPreferences, GatewayError> {
        Self::fetch_one(
            self.request(Method::GET, USER_PREFERENCES)
                .query(&[("select", "*".to_string()), ("user_id", eq(user_id.as_str()))]),
        )
        .await
    }

    async fn update_user_preferences(
        &self,
        user_id: &UserId,
        patch: &PreferencesPatch,
    ) -> Result<(), GatewayError> {
        Self::patch_existing(
            self.request(Method::PATCH, USER_PREFERENCES)
                .query(&[("user_id", eq(user_id.as_str()))])
                .json(patch),
        )
        .await
    }
}
