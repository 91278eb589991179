//! # Dependency Injection / 依赖注入
//!
//! Creates the infra adapters and injects them into [`App`]. Assembly only:
//! fallbacks for absent config values are decided here, business decisions are not.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use qf_app::{App, AppDeps};
use qf_core::config::AppConfig;
use qf_core::FREE_TIER_QUOTA;
use qf_infra::remote::{RestDataGateway, RestGatewayConfig};
use qf_infra::widget::{default_slot_path, FileWidgetSlot};
use qf_infra::SystemClock;
use tracing::info;

fn widget_slot_path(config: &AppConfig) -> anyhow::Result<PathBuf> {
    match &config.widget_slot_path {
        Some(path) => Ok(path.clone()),
        None => default_slot_path().context("no data directory for the widget slot, set [widget] slot_path"),
    }
}

/// The widget slot alone. Reading it needs no remote configuration.
pub fn build_widget_slot(config: &AppConfig) -> anyhow::Result<FileWidgetSlot> {
    Ok(FileWidgetSlot::new(widget_slot_path(config)?))
}

fn build_gateway(config: &AppConfig) -> anyhow::Result<RestDataGateway> {
    if config.remote_base_url.trim().is_empty() {
        bail!("remote base_url is not configured, set [remote] base_url or QUOTEFEED_BASE_URL");
    }

    let mut gateway_config =
        RestGatewayConfig::new(config.remote_base_url.clone(), config.remote_api_key.clone());
    if let Some(secs) = config.remote_timeout_secs {
        gateway_config = gateway_config.with_timeout(Duration::from_secs(secs));
    }

    RestDataGateway::new(gateway_config).context("failed to create remote gateway")
}

/// Wire every port and build the application.
pub fn build_app(config: &AppConfig) -> anyhow::Result<App> {
    let gateway = Arc::new(build_gateway(config)?);
    let slot = build_widget_slot(config)?;
    let free_quota = config.free_quota.unwrap_or(FREE_TIER_QUOTA);

    info!(
        base_url = %config.remote_base_url,
        widget_slot = %slot.path().display(),
        free_quota,
        "application wired"
    );

    let deps = AppDeps {
        quotes: gateway.clone(),
        liked_quotes: gateway.clone(),
        profiles: gateway.clone(),
        preferences: gateway,
        widget_slot: Arc::new(slot),
        clock: Arc::new(SystemClock),
    };
    Ok(App::new(deps, free_quota))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_app_requires_base_url() {
        let err = build_app(&AppConfig::empty()).err().unwrap();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_configured_slot_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::empty();
        config.widget_slot_path = Some(dir.path().join("slot.json"));

        let slot = build_widget_slot(&config).unwrap();

        assert_eq!(slot.path(), dir.path().join("slot.json"));
    }

    #[test]
    fn test_build_app_applies_free_quota() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::empty();
        config.remote_base_url = "http://127.0.0.1:9".into();
        config.widget_slot_path = Some(dir.path().join("slot.json"));
        config.free_quota = Some(3);

        let app = build_app(&config).unwrap();

        assert_eq!(app.feed().quota(), 3);
    }
}
