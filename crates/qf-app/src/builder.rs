//! Application assembly
//! 应用组装
//!
//! [`App`] owns the long-lived controllers (feed, likes) and hands out
//! short-lived use cases that share them.

use std::sync::Arc;

use qf_core::onboarding::StepSequence;

use crate::deps::AppDeps;
use crate::usecases::{
    ApplyEntitlementUpdate, CheckEntitlement, LikeSynchronizer, OnboardingFlowController,
    QuoteFeedController, StartSession, UpdatePreferences, WidgetBridge,
};

pub struct App {
    deps: AppDeps,
    widget: WidgetBridge,
    feed: Arc<QuoteFeedController>,
    likes: Arc<LikeSynchronizer>,
}

impl App {
    /// The constructor signature is the dependency manifest. `free_quota` is the
    /// number of feed positions open to non-premium users.
    pub fn new(deps: AppDeps, free_quota: usize) -> Self {
        let widget = WidgetBridge::new(deps.widget_slot.clone());
        let feed = Arc::new(QuoteFeedController::new(
            deps.quotes.clone(),
            deps.clock.clone(),
            widget.clone(),
            free_quota,
        ));
        let likes = Arc::new(LikeSynchronizer::new(deps.liked_quotes.clone()));

        Self {
            deps,
            widget,
            feed,
            likes,
        }
    }

    pub fn feed(&self) -> Arc<QuoteFeedController> {
        self.feed.clone()
    }

    pub fn likes(&self) -> Arc<LikeSynchronizer> {
        self.likes.clone()
    }

    pub fn widget(&self) -> &WidgetBridge {
        &self.widget
    }

    pub fn start_session(&self) -> StartSession {
        StartSession::new(
            self.deps.profiles.clone(),
            self.deps.preferences.clone(),
            self.feed.clone(),
            self.likes.clone(),
        )
    }

    pub fn check_entitlement(&self) -> CheckEntitlement {
        CheckEntitlement::new(self.deps.profiles.clone(), self.deps.clock.clone())
    }

    pub fn apply_entitlement_update(&self) -> ApplyEntitlementUpdate {
        ApplyEntitlementUpdate::new(self.deps.profiles.clone())
    }

    pub fn update_preferences(&self) -> UpdatePreferences {
        UpdatePreferences::new(self.deps.preferences.clone())
    }

    /// A fresh onboarding flow. Each flow owns its own draft.
    pub fn onboarding(&self, sequence: StepSequence) -> OnboardingFlowController {
        OnboardingFlowController::new(
            self.deps.profiles.clone(),
            self.deps.preferences.clone(),
            self.deps.clock.clone(),
            sequence,
        )
    }
}
