// Client settings to transport configuration

use polymer_config::ClientSettings;
use polymer_core::{Dispatcher, Result};
use polymer_http_client::HttpClientConfig;
use std::time::Duration;

/// Turn loaded client settings into an HTTP client configuration.
pub fn http_client_config(settings: &ClientSettings) -> HttpClientConfig {
    let mut builder = HttpClientConfig::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .gzip(settings.gzip)
        .brotli(settings.brotli)
        .follow_redirects(settings.follow_redirects)
        .max_redirects(settings.max_redirects);

    if let Some(base_url) = &settings.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(user_agent) = &settings.user_agent {
        builder = builder.user_agent(user_agent);
    }
    for (name, value) in &settings.default_headers {
        builder = builder.default_header(name, value);
    }

    builder.build()
}

/// Build an HTTP dispatcher from loaded client settings.
pub fn dispatcher_from_settings(settings: &ClientSettings) -> Result<Dispatcher> {
    Dispatcher::with_http_config(http_client_config(settings))
}
