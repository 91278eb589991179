use thiserror::Error;

use super::OnboardingStep;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    #[error("onboarding step {0:?} cannot be skipped")]
    NotSkippable(OnboardingStep),

    #[error("cannot skip {requested:?} while on {current:?}")]
    StepMismatch {
        current: OnboardingStep,
        requested: OnboardingStep,
    },

    #[error("onboarding has not reached the completed step (currently {0:?})")]
    NotFinished(OnboardingStep),

    #[error("onboarding was already committed")]
    AlreadyCommitted,
}
