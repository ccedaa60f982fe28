//! Endpoint descriptors: the static configuration of one API resource.

use crate::codec::{SharedRequestCodec, SharedResponseCodec};
use crate::{Operation, PolymerError, Result};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Decides whether a slug value may be inserted for a placeholder.
/// Receives `(value, placeholder)`.
pub type SlugValidityCheck = Arc<dyn Fn(&Value, &str) -> bool + Send + Sync>;

/// Rewrites a slug value before insertion. Receives `(raw value,
/// placeholder)`; `raw value` is `Null` when the slug has no entry.
pub type SlugValueForPath = Arc<dyn Fn(&Value, &str) -> Result<Value> + Send + Sync>;

/// Rewrites the decoded response body before it is mapped.
pub type ResponseTransformer = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Capability set describing one resource.
///
/// Only `base_url` and `path` are required. Each optional capability
/// documents what happens when it is absent.
#[derive(Clone)]
pub struct EndpointDescriptor {
    base_url: String,
    path: String,
    response_key_path: Option<String>,
    acceptable_content_types: Option<BTreeSet<String>>,
    header_fields: Option<BTreeMap<String, String>>,
    request_codec: Option<SharedRequestCodec>,
    response_codec: Option<SharedResponseCodec>,
    append_header_to_response: bool,
    slug_mapping: BTreeMap<String, String>,
    nil_slug_values: BTreeMap<String, Value>,
    slug_validity_check: Option<SlugValidityCheck>,
    slug_value_for_path: Option<SlugValueForPath>,
    response_transformer: Option<ResponseTransformer>,
}

impl EndpointDescriptor {
    /// `path` is appended to `base_url`, or used alone when it is already an
    /// absolute http(s) URL. Segments written `:name` are slug placeholders.
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            response_key_path: None,
            acceptable_content_types: None,
            header_fields: None,
            request_codec: None,
            response_codec: None,
            append_header_to_response: false,
            slug_mapping: BTreeMap::new(),
            nil_slug_values: BTreeMap::new(),
            slug_validity_check: None,
            slug_value_for_path: None,
            response_transformer: None,
        }
    }

    /// Dotted path to the sub-tree that is mapped, e.g. `"artists.items"`.
    /// Absent: the payload root is mapped.
    pub fn with_response_key_path(mut self, key_path: impl Into<String>) -> Self {
        self.response_key_path = Some(key_path.into());
        self
    }

    /// Content types sent as `Accept` and enforced on the response.
    /// Absent: any content type is accepted.
    pub fn with_acceptable_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acceptable_content_types = Some(
            types
                .into_iter()
                .map(|t| t.into().to_ascii_lowercase())
                .collect(),
        );
        self
    }

    /// Add a request header. Absent: only the transport's default headers.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_fields
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Absent: JSON.
    pub fn with_request_codec(mut self, codec: SharedRequestCodec) -> Self {
        self.request_codec = Some(codec);
        self
    }

    /// Absent: JSON with a UTF-8 text fallback.
    pub fn with_response_codec(mut self, codec: SharedResponseCodec) -> Self {
        self.response_codec = Some(codec);
        self
    }

    /// Attach response headers to mapped objects under `"Header"`.
    pub fn with_header_appended_to_response(mut self, append: bool) -> Self {
        self.append_header_to_response = append;
        self
    }

    /// Look up `placeholder` through `key_path` when the slug is an object
    /// whose field names differ from the placeholders.
    pub fn with_slug_mapping(
        mut self,
        placeholder: impl Into<String>,
        key_path: impl Into<String>,
    ) -> Self {
        self.slug_mapping.insert(placeholder.into(), key_path.into());
        self
    }

    /// Treat `value` as "no value" for `placeholder`, e.g. an id of `0`.
    /// Such placeholders are dropped from the path.
    pub fn with_nil_slug_value(mut self, placeholder: impl Into<String>, value: Value) -> Self {
        self.nil_slug_values.insert(placeholder.into(), value);
        self
    }

    /// Absent: every value is valid; null and nil values drop the segment.
    pub fn with_slug_validity_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value, &str) -> bool + Send + Sync + 'static,
    {
        self.slug_validity_check = Some(Arc::new(check));
        self
    }

    /// Absent: the looked-up value is inserted unchanged.
    pub fn with_slug_value_for_path<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Value, &str) -> Result<Value> + Send + Sync + 'static,
    {
        self.slug_value_for_path = Some(Arc::new(transform));
        self
    }

    /// Absent: the decoded body is mapped as-is.
    pub fn with_response_transformer<F>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.response_transformer = Some(Arc::new(transform));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn response_key_path(&self) -> Option<&str> {
        self.response_key_path.as_deref()
    }

    pub fn acceptable_content_types(&self) -> Option<&BTreeSet<String>> {
        self.acceptable_content_types.as_ref()
    }

    pub fn header_fields(&self) -> Option<&BTreeMap<String, String>> {
        self.header_fields.as_ref()
    }

    pub fn request_codec(&self) -> Option<&SharedRequestCodec> {
        self.request_codec.as_ref()
    }

    pub fn response_codec(&self) -> Option<&SharedResponseCodec> {
        self.response_codec.as_ref()
    }

    pub fn append_header_to_response(&self) -> bool {
        self.append_header_to_response
    }

    pub fn slug_mapping(&self) -> &BTreeMap<String, String> {
        &self.slug_mapping
    }

    pub fn nil_slug_values(&self) -> &BTreeMap<String, Value> {
        &self.nil_slug_values
    }

    pub fn slug_validity_check(&self) -> Option<&SlugValidityCheck> {
        self.slug_validity_check.as_ref()
    }

    pub fn slug_value_for_path(&self) -> Option<&SlugValueForPath> {
        self.slug_value_for_path.as_ref()
    }

    pub fn response_transformer(&self) -> Option<&ResponseTransformer> {
        self.response_transformer.as_ref()
    }
}

impl fmt::Debug for EndpointDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointDescriptor")
            .field("base_url", &self.base_url)
            .field("path", &self.path)
            .field("response_key_path", &self.response_key_path)
            .field("acceptable_content_types", &self.acceptable_content_types)
            .field("header_fields", &self.header_fields)
            .field("request_codec", &self.request_codec)
            .field("response_codec", &self.response_codec)
            .field("append_header_to_response", &self.append_header_to_response)
            .field("slug_mapping", &self.slug_mapping)
            .field("nil_slug_values", &self.nil_slug_values)
            .field("slug_validity_check", &self.slug_validity_check.is_some())
            .field("slug_value_for_path", &self.slug_value_for_path.is_some())
            .field("response_transformer", &self.response_transformer.is_some())
            .finish()
    }
}

/// A resource type that produces its descriptor for a given verb.
///
/// Implemented by marker types used as the first parameter of
/// [`Endpoint`](crate::Endpoint). The verb is passed in so a descriptor can
/// vary, say, its key path between GET and POST.
///
/// ```
/// use polymer_core::{DescribeEndpoint, EndpointDescriptor, Operation, Result};
///
/// #[derive(Default)]
/// struct ArtistSearch;
///
/// impl DescribeEndpoint for ArtistSearch {
///     fn describe(&self, _operation: Operation) -> Result<EndpointDescriptor> {
///         Ok(EndpointDescriptor::new("https://api.spotify.com/v1", "search")
///             .with_response_key_path("artists.items"))
///     }
/// }
/// ```
pub trait DescribeEndpoint: Send + Sync + 'static {
    /// Errors are reported as `PolymerError::Configuration` before any
    /// network activity.
    fn describe(&self, operation: Operation) -> Result<EndpointDescriptor>;
}

impl DescribeEndpoint for EndpointDescriptor {
    fn describe(&self, _operation: Operation) -> Result<EndpointDescriptor> {
        Ok(self.clone())
    }
}

/// Resolve a descriptor, forcing any failure into a configuration error.
pub(crate) fn resolve<D: DescribeEndpoint + ?Sized>(
    describer: &D,
    operation: Operation,
) -> Result<EndpointDescriptor> {
    describer.describe(operation).map_err(|err| match err {
        PolymerError::Configuration(_) => err,
        other => PolymerError::Configuration(other.to_string()),
    })
}
