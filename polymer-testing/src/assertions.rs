// Assertions for endpoint responses and recorded requests

use polymer_core::{PolymerError, Response, TransportRequest};
use std::fmt::Debug;

/// Assert that a response carries exactly `expected` results
pub fn assert_result_count<U: Debug>(response: &Response<U>, expected: usize) {
    match response {
        Response::Result(items) => assert_eq!(
            items.len(),
            expected,
            "Expected {} results, got {}",
            expected,
            items.len()
        ),
        Response::Error(err) => panic!("Expected {} results, got error: {}", expected, err),
    }
}

/// Assert that a response carries the given results, in order
pub fn assert_results<U: Debug + PartialEq>(response: &Response<U>, expected: &[U]) {
    assert_eq!(
        response.items(),
        Some(expected),
        "Results do not match, response was {:?}",
        response
    );
}

/// Assert that a response is an error accepted by `matches`
pub fn assert_error<U: Debug>(response: &Response<U>, matches: impl FnOnce(&PolymerError) -> bool) {
    match response.error() {
        Some(err) => assert!(matches(err), "Unexpected error: {:?}", err),
        None => panic!("Expected an error, got {:?}", response),
    }
}

/// Assert that a response is an unknown-response error
pub fn assert_unknown<U: Debug>(response: &Response<U>) {
    assert_error(response, PolymerError::is_unknown);
}

/// Assert that a request carries a header
pub fn assert_request_header(request: &TransportRequest, name: &str, expected: &str) {
    let actual = request.headers.get(name).map(String::as_str);
    assert_eq!(
        actual,
        Some(expected),
        "Expected header '{}' to be '{}', got {:?}",
        name,
        expected,
        actual
    );
}

/// Assert that a request targets `path`
pub fn assert_request_path(request: &TransportRequest, expected: &str) {
    assert_eq!(
        request.url.path(),
        expected,
        "Expected path '{}', got '{}'",
        expected,
        request.url.path()
    );
}
