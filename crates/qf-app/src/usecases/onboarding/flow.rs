use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveTime;
use qf_core::onboarding::{
    OnboardingError, OnboardingState, OnboardingStateMachine, OnboardingStep, StepSequence,
};
use qf_core::ports::{ClockPort, GatewayError, UserPreferencesRepositoryPort, UserProfileRepositoryPort};
use qf_core::user::Gender;
use qf_core::{Category, EntitlementUpdate, UserId, UserPreferences, UserProfile};
use tracing::{error, info, info_span, Instrument};

/// Errors produced by [`OnboardingFlowController::commit`].
///
/// The two remote phases fail distinctly so callers know whether a retry has to
/// rewrite the profile or only the preferences.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error(transparent)]
    Flow(#[from] OnboardingError),

    #[error("failed to save profile: {0}")]
    ProfileFailed(#[source] GatewayError),

    #[error("profile saved but preferences failed: {0}")]
    PreferencesFailed(#[source] GatewayError),

    #[error("profile already saved for user {saved}, cannot resume for {requested}")]
    UserMismatch { saved: UserId, requested: UserId },
}

/// Progress of the non-transactional two-step write.
///
/// 两阶段写入进度：先写 profile，再写 preferences，互不回滚。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitPhase {
    NotStarted,
    ProfileWritten(UserProfile),
    Committed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedOnboarding {
    pub profile: UserProfile,
    pub preferences: UserPreferences,
}

pub struct OnboardingFlowController {
    profiles: Arc<dyn UserProfileRepositoryPort>,
    preferences: Arc<dyn UserPreferencesRepositoryPort>,
    clock: Arc<dyn ClockPort>,
    state: OnboardingState,
    phase: CommitPhase,
}

impl OnboardingFlowController {
    pub fn new(
        profiles: Arc<dyn UserProfileRepositoryPort>,
        preferences: Arc<dyn UserPreferencesRepositoryPort>,
        clock: Arc<dyn ClockPort>,
        sequence: StepSequence,
    ) -> Self {
        Self {
            profiles,
            preferences,
            clock,
            state: OnboardingState::new(sequence),
            phase: CommitPhase::NotStarted,
        }
    }

    pub fn current_step(&self) -> OnboardingStep {
        self.state.current_step()
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn phase(&self) -> &CommitPhase {
        &self.phase
    }

    pub fn next(&mut self) -> OnboardingStep {
        let from = self.state.current_step();
        if OnboardingStateMachine::next(&mut self.state) {
            info!(from = ?from, to = ?self.state.current_step(), "onboarding step transition");
        }
        self.state.current_step()
    }

    pub fn previous(&mut self) -> OnboardingStep {
        let from = self.state.current_step();
        if OnboardingStateMachine::previous(&mut self.state) {
            info!(from = ?from, to = ?self.state.current_step(), "onboarding step back");
        }
        self.state.current_step()
    }

    /// Clear what `step` collected and move on. `step` must be the current,
    /// skippable step; anything else is rejected without changing state.
    pub fn skip(&mut self, step: OnboardingStep) -> Result<OnboardingStep, OnboardingError> {
        OnboardingStateMachine::skip(&mut self.state, step)?;
        info!(skipped = ?step, to = ?self.state.current_step(), "onboarding step skipped");
        Ok(self.state.current_step())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.state.draft.name = Some(name.into());
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.state.draft.gender = gender;
    }

    /// Add the goal if absent, remove it otherwise.
    pub fn toggle_goal(&mut self, goal: impl Into<String>) {
        let goal = goal.into();
        let goals = &mut self.state.draft.goals;
        if let Some(pos) = goals.iter().position(|g| *g == goal) {
            goals.remove(pos);
        } else {
            goals.push(goal);
        }
    }

    pub fn set_categories(&mut self, categories: BTreeSet<Category>) {
        self.state.draft.categories = categories;
    }

    pub fn toggle_category(&mut self, category: impl Into<Category>) {
        let category = category.into();
        let categories = &mut self.state.draft.categories;
        if !categories.remove(&category) {
            categories.insert(category);
        }
    }

    pub fn set_notification_time(&mut self, time: NaiveTime) {
        self.state.draft.notification_time = time;
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.state.draft.notifications_enabled = enabled;
    }

    /// Subscription state reported by the store during the subscription intro.
    pub fn record_subscription(&mut self, update: EntitlementUpdate) {
        self.state.draft.subscription = Some(update);
    }

    /// Persist the collected data: profile first, then preferences.
    ///
    /// A profile failure aborts before preferences are attempted. A preferences
    /// failure leaves the saved profile in place; calling `commit` again for the
    /// same user resumes at the preferences write with the saved profile.
    pub async fn commit(
        &mut self,
        user_id: &UserId,
        email: &str,
    ) -> Result<CommittedOnboarding, CommitError> {
        let step = self.state.current_step();
        if !step.is_terminal() {
            return Err(OnboardingError::NotFinished(step).into());
        }

        let span = info_span!("usecase.onboarding.commit", user_id = %user_id);
        async {
            let resumed = match &self.phase {
                CommitPhase::Committed => {
                    return Err(CommitError::Flow(OnboardingError::AlreadyCommitted))
                }
                CommitPhase::ProfileWritten(profile) if profile.id != *user_id => {
                    return Err(CommitError::UserMismatch {
                        saved: profile.id.clone(),
                        requested: user_id.clone(),
                    })
                }
                CommitPhase::ProfileWritten(profile) => Some(profile.clone()),
                CommitPhase::NotStarted => None,
            };

            let profile = match resumed {
                Some(profile) => {
                    info!("profile already saved, resuming at preferences");
                    profile
                }
                None => {
                    let profile =
                        self.state
                            .draft
                            .to_profile(user_id.clone(), email, self.clock.now());
                    self.profiles
                        .insert_user_profile(&profile)
                        .await
                        .map_err(|e| {
                            error!(error = %e, "onboarding profile write failed");
                            CommitError::ProfileFailed(e)
                        })?;
                    self.phase = CommitPhase::ProfileWritten(profile.clone());
                    profile
                }
            };

            let preferences = self.state.draft.to_preferences(profile.id.clone());
            self.preferences
                .insert_user_preferences(&preferences)
                .await
                .map_err(|e| {
                    error!(error = %e, "onboarding preferences write failed");
                    CommitError::PreferencesFailed(e)
                })?;

            self.phase = CommitPhase::Committed;
            info!("onboarding committed");
            Ok(CommittedOnboarding {
                profile,
                preferences,
            })
        }
        .instrument(span)
        .await
    }
}
