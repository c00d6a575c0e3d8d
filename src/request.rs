//! Request values passed to (and recorded from) client execution calls.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{RestMockError, Result};

/// HTTP method of a [`RestRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// GET (the default for a new request).
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl Method {
    /// The canonical upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RestMockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(RestMockError::InvalidMethod(s.to_string())),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// How a [`Parameter`] is transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Appended to the query string.
    Query,
    /// Sent as the request body.
    Body,
}

/// A single named request parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name. For body parameters this is the content type.
    pub name: String,
    /// Parameter value.
    pub value: String,
    /// Where the parameter travels.
    pub kind: ParameterKind,
}

/// A request to be issued through a [`RestClient`](crate::RestClient).
///
/// Built by the code under test and recorded verbatim onto the mocked
/// response when the client intercepts the call. Parameters keep their
/// insertion order.
///
/// # Example
///
/// ```
/// use restmock::{Method, RestRequest};
///
/// let request = RestRequest::new("/posts/1", Method::Get)
///     .with_param("expand", "comments");
///
/// assert_eq!(request.resource(), "/posts/1");
/// assert_eq!(request.method(), Method::Get);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RestRequest {
    resource: String,
    method: Method,
    params: Vec<Parameter>,
}

impl RestRequest {
    /// Create a request for a resource path with an explicit method.
    pub fn new(resource: impl Into<String>, method: Method) -> Self {
        Self {
            resource: resource.into(),
            method,
            params: Vec::new(),
        }
    }

    /// Create a GET request for a resource path.
    pub fn get(resource: impl Into<String>) -> Self {
        Self::new(resource, Method::Get)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(Parameter {
            name: name.into(),
            value: value.into(),
            kind: ParameterKind::Query,
        });
        self
    }

    /// Serialize a value to JSON and attach it as the request body.
    ///
    /// The body travels as a parameter named `application/json`, mirroring
    /// how the parameter list carries every part of the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn with_json_body<B: Serialize>(mut self, body: &B) -> Result<Self> {
        let json = serde_json::to_string(body)?;
        self.params.push(Parameter {
            name: "application/json".to_string(),
            value: json,
            kind: ParameterKind::Body,
        });
        Ok(self)
    }

    /// The resource path this request targets.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// All parameters, in insertion order.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// The serialized body parameter, if one was attached.
    pub fn body(&self) -> Option<&Parameter> {
        self.params.iter().find(|p| p.kind == ParameterKind::Body)
    }
}
