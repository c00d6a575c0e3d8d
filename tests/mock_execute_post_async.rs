//! Example suite for the suspending POST shape.

mod common;

use common::{sample_user, PostsApi};
use restmock::{Method, MockRestClient};

#[tokio::test]
async fn typed_response_returns_created_user() {
    let client = MockRestClient::new();
    let api = PostsApi::new(&client);
    let user = sample_user(7);

    let response = client
        .mock_typed_response()
        .with_status_code(201)
        .returns(user.clone())
        .unwrap()
        .mock_execute_post_async();

    let created = api.add_user(&user).await.expect("add_user");

    assert_eq!(created, Some(user));
    let request = response.request().expect("request recorded");
    assert_eq!(request.method(), Method::Post);
    assert_eq!(request.resource(), "/user/add");
    assert!(request.body().unwrap().value.contains("Jackson"));
}

#[tokio::test]
async fn untyped_accepted_status_is_observed() {
    let client = MockRestClient::new();
    let api = PostsApi::new(&client);
    let user = sample_user(7);

    client
        .mock_response()
        .with_status_code(202)
        .mock_execute_post_async();

    let accepted = api
        .add_user_without_response(&user)
        .await
        .expect("add_user_without_response");

    assert!(accepted);
}
