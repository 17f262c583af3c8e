//! Description of an unsigned call.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::HeaderMap;
use http::HeaderName;
use http::HeaderValue;
use http::Method;

use crate::error::Result;

/// Everything the caller decides about a call before it is signed.
///
/// The canonical request, the signature and the wire request are all derived
/// from this plus the service descriptor and a single timestamp.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: BTreeMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Describe a call with the given method and URI path.
    ///
    /// `path` must already be URL-safe: it is signed and transmitted verbatim.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Request {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Describe a GET call.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Describe a POST call.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Add one query parameter.
    ///
    /// Keys are assumed URL-safe and pass through unencoded; values are
    /// percent-encoded during canonicalization. Parameters always sort
    /// ascending by key, and a repeated key keeps the last value.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set one header.
    ///
    /// Header names are case-insensitive; setting the same name twice keeps
    /// the last value.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        self.headers.insert(name, HeaderValue::from_str(value)?);
        Ok(self)
    }

    /// Set the request body.
    ///
    /// GET, DELETE and HEAD requests never carry a body on the wire, whatever
    /// is set here.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// HTTP method of the call.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// URI path of the call.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters, sorted by key.
    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Caller-supplied headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body as set by the caller.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The bytes that will actually be transmitted and hashed.
    pub(crate) fn payload(&self) -> Bytes {
        if self.method == Method::GET || self.method == Method::DELETE || self.method == Method::HEAD
        {
            Bytes::new()
        } else {
            self.body.clone()
        }
    }
}
