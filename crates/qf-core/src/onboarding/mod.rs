//! Onboarding domain models
//!
//! This module defines the step ordering, the data collected along the way and
//! a pure state machine that moves between steps. Persisting the collected data
//! is the application layer's job.

mod draft;
mod error;
mod state_machine;
mod step;

pub use draft::{OnboardingDraft, DEFAULT_CATEGORIES};
pub use error::OnboardingError;
pub use state_machine::{OnboardingState, OnboardingStateMachine};
pub use step::{OnboardingStep, StepSequence};
