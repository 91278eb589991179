//! # Bootstrap / 启动装配
//!
//! Config loading, tracing initialisation and dependency wiring. This is the
//! only module that depends on `qf-core`, `qf-app` and `qf-infra` at once.

pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{apply_overrides, default_config_path, load_config, load_config_or_empty};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{build_app, build_widget_slot};
