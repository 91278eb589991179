//! Onboarding state machine.
//!
//! Transitions are synchronous and only ever move one position along the
//! configured [`StepSequence`].

use tracing::debug;

use super::{OnboardingDraft, OnboardingError, OnboardingStep, StepSequence};

/// Current position in the flow plus everything collected so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingState {
    sequence: StepSequence,
    position: usize,
    pub draft: OnboardingDraft,
}

impl OnboardingState {
    pub fn new(sequence: StepSequence) -> Self {
        Self {
            sequence,
            position: 0,
            draft: OnboardingDraft::default(),
        }
    }

    pub fn current_step(&self) -> OnboardingStep {
        self.sequence
            .get(self.position)
            .unwrap_or(OnboardingStep::Completed)
    }

    pub fn is_completed(&self) -> bool {
        self.current_step().is_terminal()
    }
}

impl Default for OnboardingState {
    fn default() -> Self {
        Self::new(StepSequence::standard())
    }
}

/// Pure onboarding state machine.
///
/// 纯状态机：不包含副作用。
pub struct OnboardingStateMachine;

impl OnboardingStateMachine {
    /// Move forward one step. Returns whether the position changed.
    pub fn next(state: &mut OnboardingState) -> bool {
        if state.is_completed() || state.position >= state.sequence.last_index() {
            debug!(step = ?state.current_step(), "onboarding next ignored at terminal step");
            return false;
        }
        state.position += 1;
        true
    }

    /// Move back one step. A no-op on the first step and once `Completed` is reached.
    pub fn previous(state: &mut OnboardingState) -> bool {
        if state.position == 0 || state.is_completed() {
            debug!(step = ?state.current_step(), "onboarding previous ignored");
            return false;
        }
        state.position -= 1;
        true
    }

    /// Clear the input collected on `step` and advance.
    ///
    /// `step` must be skippable and must be the current step.
    pub fn skip(state: &mut OnboardingState, step: OnboardingStep) -> Result<(), OnboardingError> {
        if !step.is_skippable() {
            return Err(OnboardingError::NotSkippable(step));
        }
        let current = state.current_step();
        if current != step {
            return Err(OnboardingError::StepMismatch {
                current,
                requested: step,
            });
        }
        state.draft.clear_step(step);
        Self::next(state);
        Ok(())
    }
}
