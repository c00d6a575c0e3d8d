//! The fictitious posts API the example suites run against.
//!
//! `PostsApi` is a thin client wrapper in the shape of real code under
//! test: it builds requests, issues them through the [`RestClient`] trait,
//! and unpacks the responses. The suites mock the client side and assert on
//! what `PostsApi` sent.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use restmock::{Method, RestClient, RestRequest, RestResponse, Result};

pub const BASE_URL: &str = "http://fakeapi.jsonparseronline.com";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub user_id: u64,
    pub category_id: u64,
    pub image_url: String,
    pub hits: u64,
    pub likes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySuccess {
    pub success: bool,
    pub id: u64,
}

/// Client wrapper for the fake posts API.
pub struct PostsApi<'a, C> {
    client: &'a C,
}

impl<'a, C: RestClient> PostsApi<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    pub async fn get_posts(&self) -> Result<Vec<Post>> {
        let request = RestRequest::get("/posts");
        let response: RestResponse<Vec<Post>> = self
            .client
            .execute_async(request, CancellationToken::new())
            .await?;
        Ok(response.data().cloned().unwrap_or_default())
    }

    pub async fn delete_post(&self, post_id: u64) -> Result<bool> {
        let request = RestRequest::new(format!("/posts/{post_id}"), Method::Delete);
        let response: RestResponse = self
            .client
            .execute_async(request, CancellationToken::new())
            .await?;
        Ok(response.is_success())
    }

    pub fn get_post(&self, post_id: u64) -> Result<Option<Post>> {
        let request = RestRequest::get(format!("/posts/{post_id}"));
        let response: RestResponse<Post> = self.client.execute(request)?;
        Ok(response.data().cloned())
    }

    /// Fetches a user by parsing the raw response content.
    pub fn get_user(&self, user_id: u64) -> Result<Option<User>> {
        let request = RestRequest::get(format!("/user/{user_id}"));
        let response: RestResponse = self.client.execute_as_get(request, "GET")?;
        match response.content() {
            Some(content) => Ok(Some(serde_json::from_str(content)?)),
            None => Ok(None),
        }
    }

    /// Fetches a user through the typed payload slot.
    pub fn get_user_information(&self, user_id: u64) -> Result<Option<User>> {
        let request = RestRequest::get(format!("/user/{user_id}"));
        let response: RestResponse<User> = self.client.execute_as_get(request, "GET")?;
        Ok(response.data().cloned())
    }

    pub fn delete_category(&self, category_id: u64) -> Result<()> {
        let request = RestRequest::new(format!("/category/{category_id}"), Method::Delete);
        let _: RestResponse = self.client.execute(request)?;
        Ok(())
    }

    pub fn post_comment(&self, comment: &str) -> Result<RestResponse> {
        let request = RestRequest::new("/comments", Method::Post)
            .with_json_body(&serde_json::json!({ "commentContent": comment }))?;
        self.client.execute_as_post(request, "POST")
    }

    pub fn add_category(&self, name: &str) -> Result<Option<CategorySuccess>> {
        let request = RestRequest::new("/category", Method::Post)
            .with_json_body(&serde_json::json!({ "name": name }))?;
        let response: RestResponse<CategorySuccess> = self.client.execute_as_post(request, "POST")?;
        Ok(response.data().cloned())
    }

    pub async fn get_category_information(&self, category_id: u64) -> Result<Option<Category>> {
        let request = RestRequest::get(format!("/category/{category_id}"));
        let response: RestResponse<Category> = self
            .client
            .execute_get_async(request, CancellationToken::new())
            .await?;
        Ok(response.data().cloned())
    }

    pub async fn get_profile(&self) -> Result<RestResponse> {
        let request = RestRequest::get("/profile");
        self.client
            .execute_get_async(request, CancellationToken::new())
            .await
    }

    pub async fn add_user(&self, user: &User) -> Result<Option<User>> {
        let request = RestRequest::new("/user/add", Method::Post).with_json_body(user)?;
        let response: RestResponse<User> = self
            .client
            .execute_post_async(request, CancellationToken::new())
            .await?;
        Ok(response.data().cloned())
    }

    pub async fn add_user_without_response(&self, user: &User) -> Result<bool> {
        let request = RestRequest::new("/user/add", Method::Post).with_json_body(user)?;
        let response: RestResponse = self
            .client
            .execute_post_async(request, CancellationToken::new())
            .await?;
        Ok(response.status_code() == 202)
    }
}

pub fn sample_post(id: u64) -> Post {
    Post {
        id,
        title: format!("Fake Post {id}"),
        content: "Fake Content Here".to_string(),
        user_id: 99,
        category_id: 3,
        image_url: "fakeurl.com/here".to_string(),
        hits: 0,
        likes: 0,
    }
}

pub fn sample_user(id: u64) -> User {
    User {
        id,
        first_name: "Bob".to_string(),
        last_name: "Jackson".to_string(),
    }
}
