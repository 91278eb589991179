//! Quote feed controller.
//!
//! Owns the ordered quote list, the current position and the free-tier quota.
//! Position changes are synchronous and hand the current quote to the widget.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use qf_core::entitlement::is_premium;
use qf_core::ports::{ClockPort, GatewayError, QuoteRepositoryPort};
use qf_core::{Category, Quote, UserProfile};
use tracing::{debug, error, info, info_span, Instrument};

use crate::usecases::widget::WidgetBridge;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("cannot load a feed without categories")]
    EmptyCategories,

    #[error("feed position {index} is out of range (feed has {len} quotes)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to load quotes, please retry: {0}")]
    Load(#[source] GatewayError),
}

impl FeedError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FeedError::Load(_))
    }
}

/// Outcome of a successful position change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedAdvance {
    pub index: usize,
    /// True only on the transition that first crossed the free-tier quota.
    pub limit_reached: bool,
}

#[derive(Default)]
struct FeedState {
    quotes: Vec<Quote>,
    index: usize,
    profile: Option<UserProfile>,
    reached_limit: bool,
    upsell_requested: bool,
}

pub struct QuoteFeedController {
    quotes: Arc<dyn QuoteRepositoryPort>,
    clock: Arc<dyn ClockPort>,
    widget: WidgetBridge,
    quota: usize,
    state: Mutex<FeedState>,
}

impl QuoteFeedController {
    pub fn new(
        quotes: Arc<dyn QuoteRepositoryPort>,
        clock: Arc<dyn ClockPort>,
        widget: WidgetBridge,
        quota: usize,
    ) -> Self {
        Self {
            quotes,
            clock,
            widget,
            quota,
            state: Mutex::new(FeedState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install the profile used for entitlement checks. `None` means signed out (free).
    pub fn set_profile(&self, profile: Option<UserProfile>) {
        self.state().profile = profile;
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Evaluated against the clock on every call.
    pub fn is_premium(&self) -> bool {
        let now = self.clock.now();
        self.state()
            .profile
            .as_ref()
            .is_some_and(|p| is_premium(p, now))
    }

    /// Replace the feed with quotes for `categories` and rewind to the first one.
    ///
    /// On failure the previous list stays in place. The quota flags survive a reload.
    pub async fn load_feed(&self, categories: &BTreeSet<Category>) -> Result<usize, FeedError> {
        if categories.is_empty() {
            return Err(FeedError::EmptyCategories);
        }

        let span = info_span!("usecase.feed.load_feed", categories = ?categories);
        async {
            let quotes = self.quotes.fetch_quotes(categories).await.map_err(|e| {
                error!(error = %e, "failed to load quote feed");
                FeedError::Load(e)
            })?;

            let (count, first) = {
                let mut state = self.state();
                state.quotes = quotes;
                state.index = 0;
                (state.quotes.len(), state.quotes.first().cloned())
            };
            info!(count, "quote feed loaded");

            if let Some(quote) = first {
                self.widget.publish_best_effort(&quote);
            }
            Ok(count)
        }
        .instrument(span)
        .await
    }

    /// The part of the feed the user may interact with.
    pub fn visible_slice(&self) -> Vec<Quote> {
        let premium = self.is_premium();
        let state = self.state();
        if premium {
            state.quotes.clone()
        } else {
            state.quotes.iter().take(self.quota).cloned().collect()
        }
    }

    /// Whether the quote at `index` is interactive. Positions past the quota are
    /// rendered disabled for free users.
    pub fn is_interactive(&self, index: usize) -> bool {
        let premium = self.is_premium();
        let len = self.state().quotes.len();
        index < len && (premium || index < self.quota)
    }

    /// Move to `index`.
    ///
    /// For a free user the first move to an index at or past the quota raises
    /// both `reached_limit` and `upsell_requested`; later moves past the boundary
    /// do not fire again until [`reset_quota`](Self::reset_quota).
    pub fn advance(&self, index: usize) -> Result<FeedAdvance, FeedError> {
        let premium = self.is_premium();
        let (quote, limit_reached) = {
            let mut state = self.state();
            let len = state.quotes.len();
            if index >= len {
                return Err(FeedError::IndexOutOfRange { index, len });
            }
            state.index = index;

            let limit_reached = !premium && index >= self.quota && !state.reached_limit;
            if limit_reached {
                state.reached_limit = true;
                state.upsell_requested = true;
            }
            (state.quotes[index].clone(), limit_reached)
        };

        if limit_reached {
            info!(index, quota = self.quota, "free quota reached, requesting upsell");
        } else {
            debug!(index, "feed position changed");
        }
        self.widget.publish_best_effort(&quote);

        Ok(FeedAdvance {
            index,
            limit_reached,
        })
    }

    pub fn current_index(&self) -> usize {
        self.state().index
    }

    pub fn current_quote(&self) -> Option<Quote> {
        let state = self.state();
        state.quotes.get(state.index).cloned()
    }

    /// Publish the current quote eagerly, when the feed first becomes visible.
    pub fn mark_visible(&self) -> Option<Quote> {
        let quote = self.current_quote()?;
        self.widget.publish_best_effort(&quote);
        Some(quote)
    }

    pub fn len(&self) -> usize {
        self.state().quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().quotes.is_empty()
    }

    pub fn reached_limit(&self) -> bool {
        self.state().reached_limit
    }

    pub fn upsell_requested(&self) -> bool {
        self.state().upsell_requested
    }

    /// The upsell was shown. `reached_limit` stays set, so it will not fire again.
    pub fn acknowledge_upsell(&self) {
        self.state().upsell_requested = false;
    }

    /// Explicitly re-arm the quota boundary.
    pub fn reset_quota(&self) {
        let mut state = self.state();
        state.reached_limit = false;
        state.upsell_requested = false;
    }
}
