//! Request builder.

use crate::{HttpClient, HttpClientError, Response, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::time::Duration;

/// HTTP request builder.
pub struct RequestBuilder<'a> {
    client: &'a HttpClient,
    method: Method,
    url: String,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
    error: Option<HttpClientError>,
}

impl<'a> RequestBuilder<'a> {
    /// Create a new request builder.
    pub(crate) fn new(client: &'a HttpClient, method: Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
            error: None,
        }
    }

    /// Add a header to the request.
    ///
    /// Names or values that are not valid HTTP make `send` fail.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => {
                tracing::error!(header = %name, "Invalid request header");
                self.error
                    .get_or_insert(HttpClientError::RequestBuild(format!("invalid header '{}'", name)));
            }
        }
        self
    }

    /// Add multiple headers to the request.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the `Accept` header from a list of content types.
    pub fn accept<I, S>(self, content_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = content_types
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if joined.is_empty() {
            self
        } else {
            self.header(http::header::ACCEPT.as_str(), joined)
        }
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add multiple query parameters.
    pub fn queries<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in params {
            self.query.push((k.into(), v.into()));
        }
        self
    }

    /// Set the request body as raw bytes with the given content type.
    pub fn body_with_type(mut self, body: impl Into<Vec<u8>>, content_type: &str) -> Self {
        if let Ok(value) = HeaderValue::try_from(content_type) {
            self.headers.insert(http::header::CONTENT_TYPE, value);
        }
        self.body = Some(body.into());
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, json: &T) -> Self {
        match serde_json::to_vec(json) {
            Ok(bytes) => self.body_with_type(bytes, "application/json"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize JSON body");
                self.error.get_or_insert(HttpClientError::Body(e.to_string()));
                self
            }
        }
    }

    /// Set the request body as form data.
    pub fn form<T: Serialize>(mut self, form: &T) -> Self {
        match serde_urlencoded::to_string(form) {
            Ok(encoded) => self.body_with_type(encoded, "application/x-www-form-urlencoded"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode form data");
                self.error.get_or_insert(HttpClientError::Body(e.to_string()));
                self
            }
        }
    }

    /// Set a custom timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the URL with query parameters.
    fn build_url(&self) -> Result<url::Url> {
        let mut url = if let Some(base) = &self.client.config().base_url {
            let base =
                url::Url::parse(base).map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;
            base.join(&self.url)
                .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?
        } else {
            url::Url::parse(&self.url).map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?
        };

        if !self.query.is_empty() {
            let mut query_pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                query_pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Send the request.
    pub async fn send(self) -> Result<Response> {
        let client = self.client;
        let request = self.build()?;
        client.execute(request).await
    }

    /// Build the reqwest request. Request headers replace client default
    /// headers of the same name.
    fn build(mut self) -> Result<reqwest::Request> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        let url = self.build_url()?;

        let mut headers = default_headers(self.client)?;
        headers.extend(self.headers);

        let mut request = self
            .client
            .inner()
            .request(self.method, url)
            .headers(headers);

        if let Some(body) = self.body {
            request = request.body(body);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        Ok(request.build()?)
    }
}

fn default_headers(client: &HttpClient) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &client.config().default_headers {
        let name = HeaderName::try_from(name.as_str()).map_err(|_| {
            HttpClientError::RequestBuild(format!("invalid default header '{}'", name))
        })?;
        let value = HeaderValue::try_from(value.as_str()).map_err(|_| {
            HttpClientError::RequestBuild(format!("invalid value for default header '{}'", name))
        })?;
        headers.append(name, value);
    }
    Ok(headers)
}
