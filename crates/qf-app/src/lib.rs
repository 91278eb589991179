//! QuoteFeed Application Orchestration Layer
//!
//! This crate contains the use cases and the stateful controllers (feed, likes,
//! onboarding) built on the ports declared in `qf-core`.

pub mod builder;
pub mod deps;
pub mod usecases;

pub use builder::App;
pub use deps::AppDeps;
