//! Mocked response values and their observation surface.
//!
//! A [`RestResponse`] is created by binding a configured
//! [`ResponseBuilder`](crate::ResponseBuilder) to an execution shape. The
//! test keeps one handle; the client hands an identical handle to the code
//! under test when the call is intercepted. Both observe the same state,
//! including the request recorded at execution time.

use std::error::Error as StdError;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use crate::request::RestRequest;

/// Completion status reported on a response.
///
/// Defaults to `None`, meaning no completion information was configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseStatus {
    /// No completion status configured.
    #[default]
    None,
    /// The call ran to completion.
    Completed,
    /// The call was aborted.
    Aborted,
    /// The call timed out.
    TimedOut,
    /// The call failed with a transport-level error.
    Error,
}

/// HTTP protocol version as a major.minor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolVersion {
    /// Major version number.
    pub major: u16,
    /// Minor version number.
    pub minor: u16,
}

impl ProtocolVersion {
    /// Create a protocol version from its parts.
    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Map a reqwest protocol version, where one is reported.
    pub(crate) fn from_http(version: reqwest::Version) -> Option<Self> {
        if version == reqwest::Version::HTTP_09 {
            Some(Self::new(0, 9))
        } else if version == reqwest::Version::HTTP_10 {
            Some(Self::new(1, 0))
        } else if version == reqwest::Version::HTTP_11 {
            Some(Self::new(1, 1))
        } else if version == reqwest::Version::HTTP_2 {
            Some(Self::new(2, 0))
        } else if version == reqwest::Version::HTTP_3 {
            Some(Self::new(3, 0))
        } else {
            None
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Immutable configuration a response is built from.
///
/// Assembled by the builder (or by `HttpRestClient` when translating a real
/// HTTP response) and frozen inside the shared handle at bind time.
pub(crate) struct ResponseParts<T> {
    pub status_code: u16,
    pub response_status: ResponseStatus,
    pub content: Option<String>,
    pub data: Option<T>,
    pub error_message: Option<String>,
    pub error_source: Option<Box<dyn StdError + Send + Sync>>,
    pub server: Option<String>,
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub headers: Vec<(String, String)>,
    pub protocol_version: Option<ProtocolVersion>,
}

impl<T> Default for ResponseParts<T> {
    fn default() -> Self {
        Self {
            status_code: 200,
            response_status: ResponseStatus::None,
            content: None,
            data: None,
            error_message: None,
            error_source: None,
            server: None,
            content_type: None,
            content_encoding: None,
            headers: Vec::new(),
            protocol_version: None,
        }
    }
}

struct ResponseInner<T> {
    parts: ResponseParts<T>,
    /// Server derived from the client base URL at execution time. Only
    /// consulted when no explicit server was configured.
    backfilled_server: OnceLock<String>,
    /// The request captured at execution time. The most recent matching
    /// call wins, as with the original interception callback.
    request: Mutex<Option<RestRequest>>,
}

/// A mocked (or translated) REST response.
///
/// Cheaply cloneable; clones share state. Configuration is immutable once
/// the response exists — only the captured request and the backfilled
/// server are attached later, when the code under test actually executes.
pub struct RestResponse<T = serde_json::Value> {
    inner: Arc<ResponseInner<T>>,
}

impl<T> Clone for RestResponse<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for RestResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestResponse")
            .field("status_code", &self.status_code())
            .field("is_success", &self.is_success())
            .field("is_executed", &self.is_executed())
            .finish_non_exhaustive()
    }
}

impl<T> RestResponse<T> {
    pub(crate) fn from_parts(parts: ResponseParts<T>) -> Self {
        Self {
            inner: Arc::new(ResponseInner {
                parts,
                backfilled_server: OnceLock::new(),
                request: Mutex::new(None),
            }),
        }
    }

    /// Attach the request observed at execution time.
    pub(crate) fn record_request(&self, request: RestRequest) {
        *self.inner.request.lock().expect("request lock poisoned") = Some(request);
    }

    /// Fill the server field from the client base URL, unless an explicit
    /// server was configured. First execution wins.
    pub(crate) fn backfill_server(&self, server: &str) {
        if self.inner.parts.server.is_none() {
            let _ = self.inner.backfilled_server.set(server.to_string());
        }
    }

    /// The HTTP status code. Defaults to 200 when never configured.
    pub fn status_code(&self) -> u16 {
        self.inner.parts.status_code
    }

    /// Whether the response counts as successful.
    ///
    /// A pure function of the final status code and response status: the
    /// code must be in `200..=299`, and if a response status was configured
    /// it must be [`ResponseStatus::Completed`]. The order in which the two
    /// fields were configured does not matter.
    pub fn is_success(&self) -> bool {
        let in_range = (200..=299).contains(&self.inner.parts.status_code);
        match self.inner.parts.response_status {
            ResponseStatus::None => in_range,
            status => in_range && status == ResponseStatus::Completed,
        }
    }

    /// The configured completion status.
    pub fn response_status(&self) -> ResponseStatus {
        self.inner.parts.response_status
    }

    /// Raw response content, if any was configured.
    pub fn content(&self) -> Option<&str> {
        self.inner.parts.content.as_deref()
    }

    /// The typed payload, if one was configured via
    /// [`returns`](crate::ResponseBuilder::returns).
    pub fn data(&self) -> Option<&T> {
        self.inner.parts.data.as_ref()
    }

    /// The configured error message.
    pub fn error_message(&self) -> Option<&str> {
        self.inner.parts.error_message.as_deref()
    }

    /// The configured error source, downcastable to its concrete type.
    pub fn error_source(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.inner.parts.error_source.as_deref()
    }

    /// The server name: the explicitly configured value, or the client base
    /// URL backfilled at execution time.
    pub fn server(&self) -> Option<&str> {
        self.inner
            .parts
            .server
            .as_deref()
            .or_else(|| self.inner.backfilled_server.get().map(String::as_str))
    }

    /// The configured content type.
    pub fn content_type(&self) -> Option<&str> {
        self.inner.parts.content_type.as_deref()
    }

    /// The configured content encoding.
    pub fn content_encoding(&self) -> Option<&str> {
        self.inner.parts.content_encoding.as_deref()
    }

    /// All configured headers, in insertion order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.inner.parts.headers
    }

    /// Look up a header value by name (ASCII case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner
            .parts
            .headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The configured protocol version.
    pub fn protocol_version(&self) -> Option<ProtocolVersion> {
        self.inner.parts.protocol_version
    }

    /// The request captured when the code under test executed, if it has.
    pub fn request(&self) -> Option<RestRequest> {
        self.inner.request.lock().expect("request lock poisoned").clone()
    }

    /// Whether the bound call has been executed by the code under test.
    pub fn is_executed(&self) -> bool {
        self.inner
            .request
            .lock()
            .expect("request lock poisoned")
            .is_some()
    }
}
