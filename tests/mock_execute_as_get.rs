//! Example suite for the verb-tagged blocking GET shape.

mod common;

use common::{sample_user, PostsApi};
use restmock::{Method, MockRestClient};

#[test]
fn typed_response_returns_user() {
    let client = MockRestClient::new();
    let api = PostsApi::new(&client);
    let fake_user = sample_user(3);

    let response = client
        .mock_typed_response()
        .with_status_code(200)
        .returns(fake_user.clone())
        .unwrap()
        .mock_execute_as_get("GET");

    let user = api.get_user_information(1).expect("get_user_information");

    assert_eq!(user, Some(fake_user));
    assert_eq!(response.status_code(), 200);
    assert!(response.is_success());
    assert!(response.content().is_some());

    let request = response.request().expect("request recorded");
    assert_eq!(request.method(), Method::Get);
    assert_eq!(request.resource(), "/user/1");
}

#[test]
fn untyped_response_content_is_parseable() {
    let client = MockRestClient::new();
    let api = PostsApi::new(&client);

    client
        .mock_response()
        .with_status_code(200)
        .returns_json_string(r#"{"id":3,"firstName":"Bob","lastName":"Jackson"}"#)
        .mock_execute_as_get("GET");

    let user = api.get_user(3).expect("get_user").expect("user");

    assert_eq!(user, sample_user(3));
}

#[test]
fn verb_string_is_not_validated_against_recorded_method() {
    let client = MockRestClient::new();
    let api = PostsApi::new(&client);

    // The shape is bound with a deliberately wrong verb string; the request
    // the collaborator passes is still recorded verbatim.
    let response = client
        .mock_response()
        .with_status_code(200)
        .returns_json_string(r#"{"id":1,"firstName":"Bob","lastName":"Jackson"}"#)
        .mock_execute_as_get("POST");

    api.get_user(1).expect("get_user");

    assert_eq!(response.request().unwrap().method(), Method::Get);
}
