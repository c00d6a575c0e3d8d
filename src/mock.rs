//! In-memory mock client.
//!
//! [`MockRestClient`] implements [`RestClient`] without any network I/O.
//! Responses are configured through [`MockRestClient::mock_response`] /
//! [`MockRestClient::mock_typed_response`] and bound to one of the
//! execution shapes; the next matching call the code under test issues is
//! intercepted, its request recorded, and the bound response returned.
//!
//! All binding state is owned by the client instance. Two clients never
//! observe each other's configuration, so parallel tests are isolated.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::builder::ResponseBuilder;
use crate::client::{Payload, RestClient};
use crate::error::{RestMockError, Result};
use crate::request::RestRequest;
use crate::response::RestResponse;

/// The client call signature a mocked response is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionShape {
    /// Blocking `execute`.
    Execute,
    /// Suspending `execute_async`.
    ExecuteAsync,
    /// Blocking `execute_as_get` with an explicit verb string.
    ExecuteAsGet,
    /// Blocking `execute_as_post` with an explicit verb string.
    ExecuteAsPost,
    /// Suspending `execute_get_async`.
    ExecuteGetAsync,
    /// Suspending `execute_post_async`.
    ExecutePostAsync,
}

impl fmt::Display for ExecutionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionShape::Execute => "execute",
            ExecutionShape::ExecuteAsync => "execute_async",
            ExecutionShape::ExecuteAsGet => "execute_as_get",
            ExecutionShape::ExecuteAsPost => "execute_as_post",
            ExecutionShape::ExecuteGetAsync => "execute_get_async",
            ExecutionShape::ExecutePostAsync => "execute_post_async",
        };
        f.write_str(name)
    }
}

/// Bindings are keyed by shape and payload type, so a typed and an untyped
/// response can coexist on the same shape.
type BindingKey = (ExecutionShape, TypeId);

/// A [`RestClient`] implementation that returns pre-configured responses.
///
/// At most one binding is active per (shape, payload type); rebinding
/// replaces the previous response. Executing a shape that has no binding
/// fails with [`RestMockError::NoBinding`].
///
/// # Example
///
/// ```
/// use restmock::{Method, MockRestClient, RestClient, RestRequest, RestResponse};
///
/// let client = MockRestClient::new();
///
/// let response = client
///     .mock_response()
///     .with_status_code(500)
///     .with_error_message("Category Id is not present")
///     .mock_execute();
///
/// // The code under test issues its call through the RestClient trait.
/// let observed: RestResponse = client
///     .execute(RestRequest::new("/category/1", Method::Delete))
///     .unwrap();
///
/// assert!(!observed.is_success());
/// assert_eq!(response.request().unwrap().resource(), "/category/1");
/// ```
pub struct MockRestClient {
    base_url: Option<Url>,
    bindings: Mutex<HashMap<BindingKey, Box<dyn Any + Send>>>,
}

impl fmt::Debug for MockRestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRestClient")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

impl Default for MockRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRestClient {
    /// Create a mock client with no base URL.
    pub fn new() -> Self {
        Self {
            base_url: None,
            bindings: Mutex::new(HashMap::new()),
        }
    }

    /// Create a mock client with a base URL.
    ///
    /// The base URL is backfilled into a mocked response's `server` field
    /// at execution time when no explicit server was configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Some(Url::parse(base_url)?),
            bindings: Mutex::new(HashMap::new()),
        })
    }

    /// Start configuring an untyped mocked response.
    ///
    /// The payload slot defaults to [`serde_json::Value`]; use
    /// [`returns_json_string`](ResponseBuilder::returns_json_string) to set
    /// raw content.
    pub fn mock_response(&self) -> ResponseBuilder<'_> {
        ResponseBuilder::new(self)
    }

    /// Start configuring a mocked response carrying a typed payload.
    pub fn mock_typed_response<T: Payload>(&self) -> ResponseBuilder<'_, T> {
        ResponseBuilder::new(self)
    }

    /// Install (or replace) the binding for a shape.
    pub(crate) fn bind<T: Payload>(&self, shape: ExecutionShape, response: RestResponse<T>) {
        tracing::debug!(%shape, "installing mock binding");
        self.bindings
            .lock()
            .expect("binding table lock poisoned")
            .insert((shape, TypeId::of::<T>()), Box::new(response));
    }

    /// Look up the binding for a shape, record the request, and backfill
    /// the server field from the base URL.
    fn intercept<T: Payload>(
        &self,
        shape: ExecutionShape,
        request: RestRequest,
    ) -> Result<RestResponse<T>> {
        let response = {
            let bindings = self.bindings.lock().expect("binding table lock poisoned");
            bindings
                .get(&(shape, TypeId::of::<T>()))
                .and_then(|binding| binding.downcast_ref::<RestResponse<T>>())
                .cloned()
                .ok_or(RestMockError::NoBinding { shape })?
        };

        tracing::debug!(%shape, resource = request.resource(), "intercepted client call");

        if let Some(base_url) = &self.base_url {
            response.backfill_server(base_url.as_str());
        }
        response.record_request(request);

        Ok(response)
    }
}

#[async_trait]
impl RestClient for MockRestClient {
    fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    fn execute<T: Payload>(&self, request: RestRequest) -> Result<RestResponse<T>> {
        self.intercept(ExecutionShape::Execute, request)
    }

    fn execute_as_get<T: Payload>(
        &self,
        request: RestRequest,
        http_method: &str,
    ) -> Result<RestResponse<T>> {
        // The verb string is not validated against the recorded request.
        tracing::debug!(http_method, "execute_as_get");
        self.intercept(ExecutionShape::ExecuteAsGet, request)
    }

    fn execute_as_post<T: Payload>(
        &self,
        request: RestRequest,
        http_method: &str,
    ) -> Result<RestResponse<T>> {
        tracing::debug!(http_method, "execute_as_post");
        self.intercept(ExecutionShape::ExecuteAsPost, request)
    }

    async fn execute_async<T: Payload>(
        &self,
        request: RestRequest,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>> {
        // Cancellation is accepted but ignored: the mocked response always
        // completes.
        let _ = cancel;
        self.intercept(ExecutionShape::ExecuteAsync, request)
    }

    async fn execute_get_async<T: Payload>(
        &self,
        request: RestRequest,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>> {
        let _ = cancel;
        self.intercept(ExecutionShape::ExecuteGetAsync, request)
    }

    async fn execute_post_async<T: Payload>(
        &self,
        request: RestRequest,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>> {
        let _ = cancel;
        self.intercept(ExecutionShape::ExecutePostAsync, request)
    }
}
