//! QuoteFeed command-line application: bootstrap and CLI on top of the
//! `qf-core` / `qf-app` / `qf-infra` layers.

pub mod bootstrap;
pub mod cli;
