//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file and maps it onto the `AppConfig` DTO. No validation and
//! no default values here; the wiring layer decides fallbacks.
//! 仅纯数据加载。

use std::path::{Path, PathBuf};

use anyhow::Context;
use qf_core::config::AppConfig;
use tracing::{debug, warn};

pub const API_KEY_ENV: &str = "QUOTEFEED_API_KEY";
pub const BASE_URL_ENV: &str = "QUOTEFEED_BASE_URL";

/// `<config_dir>/quotefeed/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quotefeed").join("config.toml"))
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Fails when the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Like [`load_config`], but a missing file yields [`AppConfig::empty`].
/// A file that exists and fails to parse is still an error.
pub fn load_config_or_empty(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        warn!(path = %config_path.display(), "config file not found, using empty config");
        return Ok(AppConfig::empty());
    }
    load_config(config_path)
}

/// Apply environment overrides (`QUOTEFEED_API_KEY`, `QUOTEFEED_BASE_URL`).
pub fn apply_overrides(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    if let Some(key) = lookup(API_KEY_ENV) {
        debug!("remote api key taken from environment");
        config.remote_api_key = key;
    }
    if let Some(url) = lookup(BASE_URL_ENV) {
        debug!(base_url = %url, "remote base url taken from environment");
        config.remote_base_url = url;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_load_config_reads_valid_toml() {
        let file = write_config(
            r#"
            [remote]
            base_url = "https://quotes.example.co"
            api_key = "anon"
            timeout_secs = 20

            [widget]
            slot_path = "/tmp/group/widget_quote.json"

            [feed]
            free_quota = 5
        "#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.remote_base_url, "https://quotes.example.co");
        assert_eq!(config.remote_api_key, "anon");
        assert_eq!(config.remote_timeout_secs, Some(20));
        assert_eq!(
            config.widget_slot_path,
            Some(PathBuf::from("/tmp/group/widget_quote.json"))
        );
        assert_eq!(config.free_quota, Some(5));
    }

    #[test]
    fn test_load_config_returns_empty_values_when_missing() {
        let file = write_config("[remote]\n");

        let config = load_config(file.path()).unwrap();

        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let file = write_config("[remote\nbase_url = ");

        let err = load_config(file.path()).unwrap_err();

        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn test_missing_file_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));

        assert_eq!(load_config_or_empty(&path).unwrap(), AppConfig::empty());
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let mut config = AppConfig::empty();
        config.remote_api_key = "from-file".into();
        config.remote_base_url = "https://file.example.co".into();

        let config = apply_overrides(config, |name| {
            (name == API_KEY_ENV).then(|| "from-env".to_string())
        });

        assert_eq!(config.remote_api_key, "from-env");
        assert_eq!(config.remote_base_url, "https://file.example.co");
    }
}
