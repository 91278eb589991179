//! # Pure Data Module / 纯数据模块
//!
//! Configuration DTOs and the TOML → DTO mapping. No validation and no default
//! value calculation happens here: absent optional values stay `None` and
//! the wiring layer decides what they fall back to.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Base URL of the remote data service, e.g. `https://xyz.supabase.co`
    pub remote_base_url: String,

    /// Anonymous API key sent with every request (may be empty)
    pub remote_api_key: String,

    /// Request timeout in seconds
    pub remote_timeout_secs: Option<u64>,

    /// Location of the shared widget slot file
    /// 小组件共享槽位文件路径
    pub widget_slot_path: Option<PathBuf>,

    /// Number of feed positions visible to free users
    pub free_quota: Option<usize>,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// Empty strings are valid facts; only malformed numbers are dropped to `None`.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let remote = toml_value.get("remote");
        let widget = toml_value.get("widget");
        let feed = toml_value.get("feed");

        Ok(Self {
            remote_base_url: remote
                .and_then(|r| r.get("base_url"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            remote_api_key: remote
                .and_then(|r| r.get("api_key"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            remote_timeout_secs: remote
                .and_then(|r| r.get("timeout_secs"))
                .and_then(|v| v.as_integer())
                .and_then(|v| u64::try_from(v).ok()),
            widget_slot_path: widget
                .and_then(|w| w.get("slot_path"))
                .and_then(|v| v.as_str())
                .map(PathBuf::from),
            free_quota: feed
                .and_then(|f| f.get("free_quota"))
                .and_then(|v| v.as_integer())
                .and_then(|v| usize::try_from(v).ok()),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig
    pub fn empty() -> Self {
        Self {
            remote_base_url: String::new(),
            remote_api_key: String::new(),
            remote_timeout_secs: None,
            widget_slot_path: None,
            free_quota: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_maps_all_sections() {
        let value: toml::Value = toml::from_str(
            r#"
            [remote]
            base_url = "https://example.supabase.co"
            api_key = "anon"
            timeout_secs = 15

            [widget]
            slot_path = "/tmp/slot.json"

            [feed]
            free_quota = 12
            "#,
        )
        .unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config.remote_base_url, "https://example.supabase.co");
        assert_eq!(config.remote_api_key, "anon");
        assert_eq!(config.remote_timeout_secs, Some(15));
        assert_eq!(config.widget_slot_path, Some(PathBuf::from("/tmp/slot.json")));
        assert_eq!(config.free_quota, Some(12));
    }

    #[test]
    fn test_missing_sections_are_empty_facts() {
        let value: toml::Value = toml::from_str("").unwrap();
        let config = AppConfig::from_toml(&value).unwrap();
        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_negative_quota_is_dropped() {
        let value: toml::Value = toml::from_str("[feed]\nfree_quota = -1").unwrap();
        let config = AppConfig::from_toml(&value).unwrap();
        assert_eq!(config.free_quota, None);
    }
}
