//! End-to-end tests: endpoints dispatched over HTTP against a mock server.

use polymer::prelude::*;
use polymer::{FormCodec, HttpClientConfig};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Repo {
    id: u64,
    name: String,
}

fn dispatcher() -> Dispatcher {
    Dispatcher::with_http_config(
        HttpClientConfig::builder()
            .user_agent("polymer-tests")
            .build(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_get_search_through_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "polymer"))
        .and(query_param("topics[]", "rest"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "items": [{"id": 1, "name": "polymer"}, {"id": 2, "name": "polymer-swift"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::new(server.uri(), "search/repositories")
        .with_response_key_path("items")
        .with_acceptable_content_types(["application/json"]);
    let endpoint: Endpoint<EndpointDescriptor, Repo> =
        Endpoint::with_descriptor(dispatcher(), descriptor)
            .with_parameters(&json!({"q": "polymer", "topics": ["rest"]}));

    let repos = endpoint.request(Operation::Get).await.into_result().unwrap();
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[1].name, "polymer-swift");
}

#[tokio::test]
async fn test_slug_and_patch_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octocat/hello-world"))
        .and(body_json(json!({"description": "Updated"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 9, "name": "hello-world"})))
        .expect(1)
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::new(server.uri(), "repos/:owner/:repo");
    let endpoint: Endpoint<EndpointDescriptor, Repo> =
        Endpoint::with_descriptor(dispatcher(), descriptor)
            .with_slug(&json!({"owner": "octocat", "repo": "hello-world"}))
            .with_parameters(&json!({"description": "Updated"}));

    let mut completed = None;
    endpoint.patch(|response| completed = Some(response)).await;

    let response = completed.unwrap();
    assert_eq!(
        response.items(),
        Some(&[Repo { id: 9, name: "hello-world".to_string() }][..])
    );
}

#[tokio::test]
async fn test_form_encoded_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login/oauth/access_token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("client_id=abc&code=xyz"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1, "name": "token"})))
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::new(server.uri(), "login/oauth/access_token")
        .with_request_codec(std::sync::Arc::new(FormCodec));
    let endpoint: Endpoint<EndpointDescriptor, Repo> =
        Endpoint::with_descriptor(dispatcher(), descriptor)
            .with_parameters(&json!({"client_id": "abc", "code": "xyz"}));

    assert!(endpoint.request(Operation::Post).await.is_result());
}

#[tokio::test]
async fn test_not_found_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/nobody/nothing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::new(server.uri(), "repos/nobody/nothing");
    let endpoint: Endpoint<EndpointDescriptor, Repo> =
        Endpoint::with_descriptor(dispatcher(), descriptor);

    let response = endpoint.request(Operation::Get).await;
    let err = response.error().cloned().unwrap();
    assert!(err.is_transport());
    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_unacceptable_content_type_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/legacy"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>maintenance</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::new(server.uri(), "legacy")
        .with_acceptable_content_types(["application/json"]);
    let endpoint: Endpoint<EndpointDescriptor, Repo> =
        Endpoint::with_descriptor(dispatcher(), descriptor);

    let response = endpoint.request(Operation::Get).await;
    match response.error() {
        Some(PolymerError::Transport { message, .. }) => {
            assert!(message.contains("text/html"), "{}", message)
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_response_headers_appended() {
    #[derive(Debug, Deserialize)]
    struct Tagged {
        name: String,
        #[serde(rename = "Header")]
        header: std::collections::BTreeMap<String, String>,
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello-world"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 1, "name": "hello-world"}))
                .insert_header("etag", "\"abc123\""),
        )
        .mount(&server)
        .await;

    let descriptor = EndpointDescriptor::new(server.uri(), "repos/octocat/hello-world")
        .with_header_appended_to_response(true);
    let endpoint: Endpoint<EndpointDescriptor, Tagged> =
        Endpoint::with_descriptor(dispatcher(), descriptor);

    let tagged = endpoint.request(Operation::Get).await.into_result().unwrap();
    assert_eq!(tagged[0].name, "hello-world");
    assert_eq!(tagged[0].header["etag"], "\"abc123\"");
}

#[cfg(feature = "config")]
#[tokio::test]
async fn test_dispatcher_from_loaded_settings() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/octocat/hello-world"))
        .and(header("x-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let manager = polymer::polymer_config::ConfigManager::new();
    manager
        .merge_value(json!({
            "timeout_secs": 5,
            "default_headers": {"X-Api-Version": "2022-11-28"}
        }))
        .unwrap();
    let settings = manager.client_settings().unwrap();

    let dispatcher = polymer::dispatcher_from_settings(&settings).unwrap();
    let endpoint: Endpoint<EndpointDescriptor, Repo> = Endpoint::with_descriptor(
        dispatcher,
        EndpointDescriptor::new(server.uri(), "repos/octocat/hello-world"),
    );

    assert_eq!(
        endpoint.request(Operation::Delete).await,
        Response::Result(Vec::new())
    );
}

#[cfg(feature = "config")]
#[tokio::test]
async fn test_facade_dispatcher_from_settings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("user-agent", "polymer-config-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "name": "octocat"})))
        .expect(1)
        .mount(&server)
        .await;

    let settings = polymer::polymer_config::ClientSettings {
        user_agent: Some("polymer-config-test".to_string()),
        ..Default::default()
    };
    let endpoint: Endpoint<EndpointDescriptor, Repo> = Endpoint::with_descriptor(
        polymer::dispatcher_from_settings(&settings).unwrap(),
        EndpointDescriptor::new(server.uri(), "user"),
    );

    assert!(endpoint.request(Operation::Get).await.is_result());
}
