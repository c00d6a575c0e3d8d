//! Fluent mock helpers for testing REST API client code.
//!
//! `restmock` lets test authors script the behavior of a REST client —
//! status codes, headers, body content, error fields — without performing
//! real network calls, and records the request the code under test issued
//! so it can be asserted on afterwards.
//!
//! # Quick Start
//!
//! ```
//! use restmock::{Method, MockRestClient, RestClient, RestRequest, RestResponse};
//!
//! // The mock client implements the same RestClient trait the code under
//! // test depends on.
//! let client = MockRestClient::new();
//!
//! // Configure the response and bind it to the blocking execute shape.
//! let response = client
//!     .mock_response()
//!     .with_status_code(202)
//!     .returns_json_string(r#"{"accepted":true}"#)
//!     .mock_execute();
//!
//! // The code under test issues its call...
//! let observed: RestResponse = client
//!     .execute(RestRequest::new("/posts/1", Method::Delete))
//!     .unwrap();
//! assert_eq!(observed.status_code(), 202);
//!
//! // ...and the test inspects what was sent.
//! let request = response.request().unwrap();
//! assert_eq!(request.method(), Method::Delete);
//! assert_eq!(request.resource(), "/posts/1");
//! ```
//!
//! Typed payloads round-trip through JSON:
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use restmock::{MockRestClient, RestClient, RestRequest, RestResponse};
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Post {
//!     id: u64,
//!     title: String,
//! }
//!
//! # tokio_test::block_on(async {
//! let client = MockRestClient::new();
//! let post = Post { id: 1, title: "Fake Post 1".to_string() };
//!
//! client
//!     .mock_typed_response::<Post>()
//!     .with_status_code(200)
//!     .returns(post.clone())
//!     .unwrap()
//!     .mock_execute_async();
//!
//! let observed: RestResponse<Post> = client
//!     .execute_async(RestRequest::get("/posts/1"), CancellationToken::new())
//!     .await
//!     .unwrap();
//!
//! assert!(observed.is_success());
//! assert_eq!(observed.data(), Some(&post));
//! # });
//! ```
//!
//! # Architecture
//!
//! The library is organized around two collaborating pieces:
//!
//! - [`ResponseBuilder`] — accumulates response configuration one fluent
//!   call at a time (status code, response status, error fields, headers,
//!   protocol version, body).
//! - [`MockRestClient`] — holds the execution bindings. A `mock_execute*`
//!   call on the builder installs an interception rule for one execution
//!   shape; when the code under test issues the matching call through the
//!   [`RestClient`] trait, the bound [`RestResponse`] is returned and the
//!   passed [`RestRequest`] recorded onto it.
//!
//! All configuration is owned by the builder and, after binding, by the
//! response value itself — there is no process-wide state, so tests that
//! run in parallel cannot observe each other's mocks.
//!
//! [`HttpRestClient`] is the production implementation of the same trait,
//! backed by reqwest.

mod builder;
mod client;
mod error;
mod mock;
mod request;
mod response;

// Re-export core types
pub use builder::ResponseBuilder;
pub use client::{HttpRestClient, Payload, RestClient};
pub use error::{RestMockError, Result};
pub use mock::{ExecutionShape, MockRestClient};
pub use request::{Method, Parameter, ParameterKind, RestRequest};
pub use response::{ProtocolVersion, ResponseStatus, RestResponse};
