// Client settings loaded from configuration sources

use crate::{ConfigValidator, Result, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transport settings for a Polymer client.
///
/// Every field has a default, so any subset may be supplied by a file or by
/// `POLYMER_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL joined with relative request URLs.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Overrides the transport's default user agent.
    pub user_agent: Option<String>,
    /// Headers sent with every request.
    pub default_headers: BTreeMap<String, String>,
    pub gzip: bool,
    pub brotli: bool,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: None,
            default_headers: BTreeMap::new(),
            gzip: true,
            brotli: true,
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        if let Some(base_url) = &self.base_url {
            ConfigValidator::is_url(base_url, "base_url")?;
        }
        ConfigValidator::in_range(self.timeout_secs, 1, 3600, "timeout_secs")?;
        ConfigValidator::in_range(self.connect_timeout_secs, 1, 600, "connect_timeout_secs")?;
        if let Some(user_agent) = &self.user_agent {
            ConfigValidator::not_empty(user_agent, "user_agent")?;
        }
        for name in self.default_headers.keys() {
            ConfigValidator::is_header_name(name, "default_headers")?;
        }
        Ok(())
    }
}
