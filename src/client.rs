//! The client capability the code under test depends on, and the
//! reqwest-backed implementation used outside of tests.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{RestMockError, Result};
use crate::request::{Method, ParameterKind, RestRequest};
use crate::response::{ProtocolVersion, ResponseParts, ResponseStatus, RestResponse};

const USER_AGENT: &str = concat!("restmock/", env!("CARGO_PKG_VERSION"));

/// Marker for payload types a response can carry.
///
/// Blanket-implemented for every type that can be deserialized and shared
/// across threads; you never implement it by hand.
pub trait Payload: DeserializeOwned + Send + Sync + 'static {}

impl<T> Payload for T where T: DeserializeOwned + Send + Sync + 'static {}

/// A REST client capable of executing requests in several call shapes.
///
/// Code under test depends on this trait; in production it is backed by
/// [`HttpRestClient`], in tests by
/// [`MockRestClient`](crate::MockRestClient). Every execution method is
/// generic over the payload type, with the untyped case being the
/// [`serde_json::Value`] default of [`RestResponse`].
///
/// # Example
///
/// ```
/// use restmock::{Method, MockRestClient, RestClient, RestRequest, RestResponse, Result};
///
/// fn delete_post<C: RestClient>(client: &C, post_id: u64) -> Result<bool> {
///     let request = RestRequest::new(format!("/posts/{post_id}"), Method::Delete);
///     let response: RestResponse = client.execute(request)?;
///     Ok(response.is_success())
/// }
///
/// let client = MockRestClient::new();
/// client.mock_response().with_status_code(200).mock_execute();
///
/// assert!(delete_post(&client, 1).unwrap());
/// ```
#[async_trait]
pub trait RestClient {
    /// The base URL requests are issued against, if one is configured.
    fn base_url(&self) -> Option<&Url>;

    /// Execute a request, blocking until the response is available.
    fn execute<T: Payload>(&self, request: RestRequest) -> Result<RestResponse<T>>;

    /// Execute a request with an explicit verb string, blocking.
    fn execute_as_get<T: Payload>(
        &self,
        request: RestRequest,
        http_method: &str,
    ) -> Result<RestResponse<T>>;

    /// Execute a request with an explicit verb string, blocking.
    fn execute_as_post<T: Payload>(
        &self,
        request: RestRequest,
        http_method: &str,
    ) -> Result<RestResponse<T>>;

    /// Execute a request asynchronously.
    async fn execute_async<T: Payload>(
        &self,
        request: RestRequest,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>>;

    /// Execute a request asynchronously as a GET.
    async fn execute_get_async<T: Payload>(
        &self,
        request: RestRequest,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>>;

    /// Execute a request asynchronously as a POST.
    async fn execute_post_async<T: Payload>(
        &self,
        request: RestRequest,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>>;
}

/// A [`RestClient`] backed by reqwest.
///
/// Async shapes run on a shared [`reqwest::Client`]; the blocking shapes
/// run on a [`reqwest::blocking::Client`] created on first use. Blocking
/// shapes must not be driven from inside an async runtime.
///
/// Response bodies are decoded as JSON into the requested payload type; a
/// body that fails to decode leaves the payload unset and carries the
/// decode error on the response's error fields.
pub struct HttpRestClient {
    http: reqwest::Client,
    blocking: OnceLock<reqwest::blocking::Client>,
    base_url: Url,
}

impl std::fmt::Debug for HttpRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpRestClient {
    /// Create a new client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: &str) -> Result<Self> {
        // Ensure base URL ends with / so joins append instead of replace
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(RestMockError::HttpError)?;

        Ok(Self {
            http,
            blocking: OnceLock::new(),
            base_url,
        })
    }

    /// The blocking client, created on first use.
    fn blocking_client(&self) -> Result<&reqwest::blocking::Client> {
        if let Some(client) = self.blocking.get() {
            return Ok(client);
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(RestMockError::HttpError)?;

        Ok(self.blocking.get_or_init(|| client))
    }

    fn request_url(&self, resource: &str) -> Result<Url> {
        Ok(self.base_url.join(resource.trim_start_matches('/'))?)
    }

    #[tracing::instrument(skip(self, request), fields(resource = request.resource(), method = %method))]
    fn send_blocking<T: Payload>(
        &self,
        request: RestRequest,
        method: Method,
    ) -> Result<RestResponse<T>> {
        let url = self.request_url(request.resource())?;
        let mut builder = self.blocking_client()?.request(method.into(), url);
        for param in request.params() {
            builder = match param.kind {
                ParameterKind::Query => {
                    builder.query(&[(param.name.as_str(), param.value.as_str())])
                }
                ParameterKind::Body => builder
                    .header(CONTENT_TYPE, param.name.as_str())
                    .body(param.value.clone()),
            };
        }

        let response = builder.send().map_err(RestMockError::HttpError)?;
        let status_code = response.status().as_u16();
        let protocol_version = ProtocolVersion::from_http(response.version());
        let headers = collect_headers(response.headers());
        let text = response.text().map_err(RestMockError::HttpError)?;

        Ok(Self::translate(
            request,
            status_code,
            protocol_version,
            headers,
            text,
        ))
    }

    #[tracing::instrument(skip(self, request, cancel), fields(resource = request.resource(), method = %method))]
    async fn send_async<T: Payload>(
        &self,
        request: RestRequest,
        method: Method,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>> {
        let url = self.request_url(request.resource())?;
        let mut builder = self.http.request(method.into(), url);
        for param in request.params() {
            builder = match param.kind {
                ParameterKind::Query => {
                    builder.query(&[(param.name.as_str(), param.value.as_str())])
                }
                ParameterKind::Body => builder
                    .header(CONTENT_TYPE, param.name.as_str())
                    .body(param.value.clone()),
            };
        }

        let exchange = async {
            let response = builder.send().await.map_err(RestMockError::HttpError)?;
            let status_code = response.status().as_u16();
            let protocol_version = ProtocolVersion::from_http(response.version());
            let headers = collect_headers(response.headers());
            let text = response.text().await.map_err(RestMockError::HttpError)?;
            Ok::<_, RestMockError>((status_code, protocol_version, headers, text))
        };

        let (status_code, protocol_version, headers, text) = tokio::select! {
            _ = cancel.cancelled() => return Err(RestMockError::Cancelled),
            result = exchange => result?,
        };

        Ok(Self::translate(
            request,
            status_code,
            protocol_version,
            headers,
            text,
        ))
    }

    /// Build a [`RestResponse`] from the pieces of an HTTP exchange.
    fn translate<T: Payload>(
        request: RestRequest,
        status_code: u16,
        protocol_version: Option<ProtocolVersion>,
        headers: Vec<(String, String)>,
        text: String,
    ) -> RestResponse<T> {
        let lookup = |name: &str| {
            headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone())
        };
        let server = lookup("server");
        let content_type = lookup("content-type");
        let content_encoding = lookup("content-encoding");

        let mut parts = ResponseParts {
            status_code,
            response_status: ResponseStatus::Completed,
            server,
            content_type,
            content_encoding,
            headers,
            protocol_version,
            ..ResponseParts::default()
        };

        if !text.is_empty() {
            match serde_json::from_str::<T>(&text) {
                Ok(data) => parts.data = Some(data),
                // A body that does not decode leaves the payload unset and
                // carries the decode error instead of failing the call.
                Err(err) => {
                    parts.error_message = Some(err.to_string());
                    parts.error_source = Some(Box::new(err));
                }
            }
            parts.content = Some(text);
        }

        let response = RestResponse::from_parts(parts);
        response.record_request(request);
        response
    }
}

#[async_trait]
impl RestClient for HttpRestClient {
    fn base_url(&self) -> Option<&Url> {
        Some(&self.base_url)
    }

    fn execute<T: Payload>(&self, request: RestRequest) -> Result<RestResponse<T>> {
        let method = request.method();
        self.send_blocking(request, method)
    }

    fn execute_as_get<T: Payload>(
        &self,
        request: RestRequest,
        http_method: &str,
    ) -> Result<RestResponse<T>> {
        let method: Method = http_method.parse()?;
        self.send_blocking(request, method)
    }

    fn execute_as_post<T: Payload>(
        &self,
        request: RestRequest,
        http_method: &str,
    ) -> Result<RestResponse<T>> {
        let method: Method = http_method.parse()?;
        self.send_blocking(request, method)
    }

    async fn execute_async<T: Payload>(
        &self,
        request: RestRequest,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>> {
        let method = request.method();
        self.send_async(request, method, cancel).await
    }

    async fn execute_get_async<T: Payload>(
        &self,
        request: RestRequest,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>> {
        self.send_async(request, Method::Get, cancel).await
    }

    async fn execute_post_async<T: Payload>(
        &self,
        request: RestRequest,
        cancel: CancellationToken,
    ) -> Result<RestResponse<T>> {
        self.send_async(request, Method::Post, cancel).await
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}
