use serde::{Deserialize, Serialize};

/// Onboarding step.
///
/// 引导步骤。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Welcome,
    /// Name and gender.
    Name,
    Goals,
    /// Category picker used by the extended sequence.
    Categories,
    WidgetIntro,
    /// Category picker used by the standard sequence.
    Preferences,
    NotificationPreferences,
    SubscriptionIntro,
    Completed,
}

impl OnboardingStep {
    /// Steps the user may explicitly skip. Category selection feeds the quote
    /// query and the terminal step commits, so neither can be skipped.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            OnboardingStep::Name
                | OnboardingStep::Goals
                | OnboardingStep::NotificationPreferences
                | OnboardingStep::SubscriptionIntro
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OnboardingStep::Completed)
    }
}

/// Fixed ordering of steps. Every sequence starts at `Welcome` and ends at `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequence {
    steps: &'static [OnboardingStep],
}

const STANDARD: &[OnboardingStep] = &[
    OnboardingStep::Welcome,
    OnboardingStep::WidgetIntro,
    OnboardingStep::Preferences,
    OnboardingStep::NotificationPreferences,
    OnboardingStep::SubscriptionIntro,
    OnboardingStep::Completed,
];

const EXTENDED: &[OnboardingStep] = &[
    OnboardingStep::Welcome,
    OnboardingStep::Name,
    OnboardingStep::Goals,
    OnboardingStep::Categories,
    OnboardingStep::WidgetIntro,
    OnboardingStep::NotificationPreferences,
    OnboardingStep::SubscriptionIntro,
    OnboardingStep::Completed,
];

impl StepSequence {
    /// welcome → widgetIntro → preferences → notificationPreferences → subscriptionIntro → completed
    pub const fn standard() -> Self {
        Self { steps: STANDARD }
    }

    /// Adds the name, goals and categories sub-steps.
    pub const fn extended() -> Self {
        Self { steps: EXTENDED }
    }

    pub fn get(&self, index: usize) -> Option<OnboardingStep> {
        self.steps.get(index).copied()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

impl Default for StepSequence {
    fn default() -> Self {
        Self::standard()
    }
}
