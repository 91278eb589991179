//! Onboarding use cases
//!
//! The flow controller wraps the pure step machine from `qf-core` and owns the
//! two-phase commit that writes the profile and then the preferences.

mod flow;

pub use flow::{CommitError, CommitPhase, CommittedOnboarding, OnboardingFlowController};
