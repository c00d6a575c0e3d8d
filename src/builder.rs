//! Fluent configuration of mocked responses.

use std::error::Error as StdError;

use serde::Serialize;

use crate::client::Payload;
use crate::error::Result;
use crate::mock::{ExecutionShape, MockRestClient};
use crate::response::{ProtocolVersion, ResponseParts, ResponseStatus, RestResponse};

/// Builds a mocked response one fluent call at a time.
///
/// Obtained from [`MockRestClient::mock_response`] (payload defaults to
/// [`serde_json::Value`]) or [`MockRestClient::mock_typed_response`]. Every
/// `with_*` call consumes and returns the builder; repeating a call
/// overwrites the previous value. The chain ends with one of the
/// `mock_execute*` operations, which installs the binding on the
/// originating client and returns the [`RestResponse`] handle.
///
/// Binding consumes the builder, so a bound response can no longer be
/// reconfigured.
///
/// # Example
///
/// ```
/// use restmock::{MockRestClient, ResponseStatus};
///
/// let client = MockRestClient::new();
/// let response = client
///     .mock_response()
///     .with_status_code(202)
///     .with_response_status(ResponseStatus::Completed)
///     .returns_json_string(r#"{"accepted":true}"#)
///     .mock_execute();
///
/// assert_eq!(response.status_code(), 202);
/// assert!(response.is_success());
/// ```
#[must_use = "a response builder does nothing until bound with a mock_execute* call"]
pub struct ResponseBuilder<'c, T = serde_json::Value> {
    client: &'c MockRestClient,
    parts: ResponseParts<T>,
}

impl<'c, T: Payload> ResponseBuilder<'c, T> {
    pub(crate) fn new(client: &'c MockRestClient) -> Self {
        Self {
            client,
            parts: ResponseParts::default(),
        }
    }

    /// Set the HTTP status code. Default: 200.
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.parts.status_code = status_code;
        self
    }

    /// Set the completion status. Default: [`ResponseStatus::None`].
    ///
    /// A status other than `Completed` forces
    /// [`is_success`](RestResponse::is_success) to report failure even for
    /// a 2xx code, regardless of the order this is called in relative to
    /// [`with_status_code`](Self::with_status_code).
    pub fn with_response_status(mut self, response_status: ResponseStatus) -> Self {
        self.parts.response_status = response_status;
        self
    }

    /// Set the error message carried on the response.
    ///
    /// Carried as plain data for the code under test to inspect; does not
    /// affect the success flag. Typically paired with a non-2xx status.
    pub fn with_error_message(mut self, error_message: impl Into<String>) -> Self {
        self.parts.error_message = Some(error_message.into());
        self
    }

    /// Set the structured error source carried on the response.
    ///
    /// The code under test (or the test itself) can downcast it back to the
    /// concrete error type via [`RestResponse::error_source`].
    pub fn with_error_source(
        mut self,
        error_source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        self.parts.error_source = Some(Box::new(error_source));
        self
    }

    /// Set the server name returned on the response.
    ///
    /// When never called, the field is backfilled from the client's base
    /// URL at execution time (if the client has one).
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.parts.server = Some(server.into());
        self
    }

    /// Set the content type returned on the response.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.parts.content_type = Some(content_type.into());
        self
    }

    /// Set the content encoding returned on the response.
    pub fn with_content_encoding(mut self, content_encoding: impl Into<String>) -> Self {
        self.parts.content_encoding = Some(content_encoding.into());
        self
    }

    /// Append a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.headers.push((name.into(), value.into()));
        self
    }

    /// Set the protocol version reported on the response.
    pub fn with_protocol_version(mut self, major: u16, minor: u16) -> Self {
        self.parts.protocol_version = Some(ProtocolVersion::new(major, minor));
        self
    }

    /// Set the response content to a raw JSON string, verbatim.
    ///
    /// No validation is performed; the text does not have to be JSON at
    /// all.
    pub fn returns_json_string(mut self, json: impl Into<String>) -> Self {
        self.parts.content = Some(json.into());
        self
    }

    /// Set the typed payload, serializing it to JSON for the content field.
    ///
    /// Deserializing the resulting [`content`](RestResponse::content)
    /// yields a value equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn returns(mut self, value: T) -> Result<Self>
    where
        T: Serialize,
    {
        self.parts.content = Some(serde_json::to_string(&value)?);
        self.parts.data = Some(value);
        Ok(self)
    }

    /// Bind to the blocking `execute` shape.
    pub fn mock_execute(self) -> RestResponse<T> {
        self.bind(ExecutionShape::Execute)
    }

    /// Bind to the suspending `execute_async` shape.
    ///
    /// A cancellation token passed by the code under test is accepted but
    /// ignored; the mocked response always completes.
    pub fn mock_execute_async(self) -> RestResponse<T> {
        self.bind(ExecutionShape::ExecuteAsync)
    }

    /// Bind to the blocking `execute_as_get` shape.
    ///
    /// The verb string is accepted as documentation of intent; it is not
    /// validated against the method of the request eventually recorded.
    pub fn mock_execute_as_get(self, http_method: &str) -> RestResponse<T> {
        tracing::debug!(http_method, "binding execute_as_get");
        self.bind(ExecutionShape::ExecuteAsGet)
    }

    /// Bind to the blocking `execute_as_post` shape.
    ///
    /// The verb string is accepted as documentation of intent; it is not
    /// validated against the method of the request eventually recorded.
    pub fn mock_execute_as_post(self, http_method: &str) -> RestResponse<T> {
        tracing::debug!(http_method, "binding execute_as_post");
        self.bind(ExecutionShape::ExecuteAsPost)
    }

    /// Bind to the suspending `execute_get_async` shape.
    pub fn mock_execute_get_async(self) -> RestResponse<T> {
        self.bind(ExecutionShape::ExecuteGetAsync)
    }

    /// Bind to the suspending `execute_post_async` shape.
    pub fn mock_execute_post_async(self) -> RestResponse<T> {
        self.bind(ExecutionShape::ExecutePostAsync)
    }

    fn bind(self, shape: ExecutionShape) -> RestResponse<T> {
        let response = RestResponse::from_parts(self.parts);
        self.client.bind(shape, response.clone());
        response
    }
}
