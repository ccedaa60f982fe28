//! URL resolution and slug substitution.
//!
//! Placeholders are whole path segments written `:name`. A slug that is an
//! object supplies values by key path; any other slug value fills every
//! placeholder.

use crate::mapper::value_at_key_path;
use crate::{EndpointDescriptor, PolymerError, Result};
use serde_json::Value;
use tracing::warn;
use url::Url;

/// Build the request URL for `descriptor`, substituting `slug` when given.
///
/// Without a slug the path is used verbatim.
pub fn resolve_url(descriptor: &EndpointDescriptor, slug: Option<&Value>) -> Result<Url> {
    let mut url = base_address(descriptor)?;

    if let Some(slug) = slug {
        let path = substitute(url.path(), descriptor, slug)?;
        url.set_path(&path);
    }

    Ok(url)
}

fn base_address(descriptor: &EndpointDescriptor) -> Result<Url> {
    let path = descriptor.path().trim();

    if let Ok(url) = Url::parse(path)
        && matches!(url.scheme(), "http" | "https")
    {
        return Ok(url);
    }

    let base = descriptor.base_url().trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(PolymerError::Configuration(format!(
            "no base url for path '{}'",
            path
        )));
    }

    let joined = match path.trim_start_matches('/') {
        "" => base.to_string(),
        rest => format!("{}/{}", base, rest),
    };

    let url = Url::parse(&joined)
        .map_err(|e| PolymerError::Configuration(format!("invalid url '{}': {}", joined, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(PolymerError::Configuration(format!(
            "url '{}' is not an absolute http(s) address",
            joined
        )));
    }
    Ok(url)
}

fn substitute(path: &str, descriptor: &EndpointDescriptor, slug: &Value) -> Result<String> {
    let mut segments = Vec::new();

    for segment in path.split('/') {
        let Some(name) = segment.strip_prefix(':').filter(|name| !name.is_empty()) else {
            segments.push(segment.to_string());
            continue;
        };

        if let Some(text) = placeholder_text(name, descriptor, slug)? {
            segments.push(urlencoding::encode(&text).into_owned());
        }
    }

    Ok(segments.join("/"))
}

/// Text for one placeholder, or `None` when the segment should be dropped.
fn placeholder_text(
    name: &str,
    descriptor: &EndpointDescriptor,
    slug: &Value,
) -> Result<Option<String>> {
    let raw = lookup(name, descriptor, slug);

    let value = match descriptor.slug_value_for_path() {
        Some(transform) => transform(&raw, name)?,
        None => raw,
    };

    if let Some(check) = descriptor.slug_validity_check()
        && !check(&value, name)
    {
        warn!(placeholder = name, value = %value, "Slug value rejected");
        return Err(PolymerError::InvalidSlug {
            path: name.to_string(),
            value,
        });
    }

    if descriptor.nil_slug_values().get(name) == Some(&value) {
        return Ok(None);
    }

    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(PolymerError::Configuration(format!(
            "slug value for ':{}' must be a scalar",
            name
        ))),
    }
}

fn lookup(name: &str, descriptor: &EndpointDescriptor, slug: &Value) -> Value {
    match slug {
        Value::Object(_) => {
            let key_path = descriptor
                .slug_mapping()
                .get(name)
                .map(String::as_str)
                .unwrap_or(name);
            value_at_key_path(slug, key_path)
                .cloned()
                .unwrap_or(Value::Null)
        }
        scalar => scalar.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn github(path: &str) -> EndpointDescriptor {
        EndpointDescriptor::new("https://api.github.com/", path)
    }

    #[test]
    fn test_join_collapses_slashes() {
        let url = resolve_url(&github("/repos"), None).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos");
    }

    #[test]
    fn test_absolute_path_ignores_base() {
        let descriptor = EndpointDescriptor::new("", "https://uploads.github.com/assets");
        let url = resolve_url(&descriptor, None).unwrap();
        assert_eq!(url.as_str(), "https://uploads.github.com/assets");
    }

    #[test]
    fn test_missing_base_is_configuration_error() {
        let err = resolve_url(&EndpointDescriptor::new("", "search"), None).unwrap_err();
        assert!(matches!(err, PolymerError::Configuration(_)));

        let err = resolve_url(&EndpointDescriptor::new("api.example.com", "x"), None).unwrap_err();
        assert!(matches!(err, PolymerError::Configuration(_)));
    }

    #[test]
    fn test_no_slug_keeps_path_verbatim() {
        let url = resolve_url(&github("repos/:owner/:name"), None).unwrap();
        assert_eq!(url.path(), "/repos/:owner/:name");
    }

    #[test]
    fn test_object_slug_substitution() {
        let slug = json!({"owner": "rust-lang", "name": "rust", "identifier": 42});
        let url = resolve_url(&github("repos/:owner/:name/issues/:identifier"), Some(&slug)).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/rust-lang/rust/issues/42");
    }

    #[test]
    fn test_slug_mapping_and_nested_key_paths() {
        let descriptor = github("repos/:owner/:name").with_slug_mapping("name", "repo.title");
        let slug = json!({"owner": "tokio-rs", "repo": {"title": "tokio"}});
        let url = resolve_url(&descriptor, Some(&slug)).unwrap();
        assert_eq!(url.path(), "/repos/tokio-rs/tokio");
    }

    #[test]
    fn test_scalar_slug_fills_placeholder() {
        let url = resolve_url(&github("users/:login"), Some(&json!("octocat"))).unwrap();
        assert_eq!(url.path(), "/users/octocat");
    }

    #[test]
    fn test_nil_and_missing_values_drop_segment() {
        let descriptor = github("repos/:owner/issues/:identifier")
            .with_nil_slug_value("identifier", json!(0));

        let url = resolve_url(&descriptor, Some(&json!({"owner": "serde-rs", "identifier": 0}))).unwrap();
        assert_eq!(url.path(), "/repos/serde-rs/issues");

        let url = resolve_url(&descriptor, Some(&json!({"owner": "serde-rs"}))).unwrap();
        assert_eq!(url.path(), "/repos/serde-rs/issues");
    }

    #[test]
    fn test_values_are_percent_encoded() {
        let url = resolve_url(&github("search/:term"), Some(&json!("a b/c"))).unwrap();
        assert_eq!(url.path(), "/search/a%20b%2Fc");
    }

    #[test]
    fn test_validity_check_rejects() {
        let descriptor = github("users/:login").with_slug_validity_check(|value, path| {
            path == "login" && value.as_str().is_some_and(|s| !s.is_empty())
        });

        let err = resolve_url(&descriptor, Some(&json!({"login": ""}))).unwrap_err();
        assert_eq!(
            err,
            PolymerError::InvalidSlug {
                path: "login".to_string(),
                value: json!(""),
            }
        );
    }

    #[test]
    fn test_value_for_path_transforms_before_check() {
        let descriptor = github("users/:login")
            .with_slug_value_for_path(|raw, _| {
                Ok(raw.as_str().map(|s| json!(s.to_lowercase())).unwrap_or(Value::Null))
            })
            .with_slug_validity_check(|value, _| value.is_string());

        let url = resolve_url(&descriptor, Some(&json!({"login": "OctoCat"}))).unwrap();
        assert_eq!(url.path(), "/users/octocat");
    }

    #[test]
    fn test_query_in_path_is_preserved() {
        let url = resolve_url(&github("users/:login?per_page=5"), Some(&json!("octocat"))).unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/octocat?per_page=5");
    }

    #[test]
    fn test_structured_slug_value_rejected() {
        let err = resolve_url(&github("users/:login"), Some(&json!({"login": ["a"]}))).unwrap_err();
        assert!(matches!(err, PolymerError::Configuration(_)));
    }
}
