use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings for [`RestDataGateway`](super::RestDataGateway).
#[derive(Debug, Clone)]
pub struct RestGatewayConfig {
    /// Project URL, e.g. `https://xyz.example.co`. The `/rest/v1` prefix is appended.
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl RestGatewayConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn rest_root(&self) -> String {
        format!("{}/rest/v1", self.base_url.trim_end_matches('/'))
    }
}
