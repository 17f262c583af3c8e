//! Service descriptor: where calls go and how signatures are scoped.

use std::fmt::Display;
use std::fmt::Formatter;

/// Scheme used to reach the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scheme {
    /// Plain HTTP, for local endpoints and tests.
    Http,
    /// HTTPS.
    #[default]
    Https,
}

impl Scheme {
    /// The scheme part of the request URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service identifies one family of signed calls: the signing name and region
/// that scope every signature, and the endpoint requests are sent to.
///
/// Immutable once handed to a [`Client`](crate::Client); nothing in the
/// pipeline mutates it.
#[derive(Debug, Clone)]
pub struct Service {
    name: String,
    scheme: Scheme,
    region: String,
    endpoint: String,
}

impl Service {
    /// Describe a service by signing name, region and endpoint.
    ///
    /// `endpoint` is the DNS name (optionally with a port) that also becomes
    /// the `host` header. The scheme defaults to HTTPS.
    pub fn new(name: &str, region: &str, endpoint: &str) -> Self {
        Service {
            name: name.to_string(),
            scheme: Scheme::default(),
            region: region.to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    /// Use a different scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Descriptor for the function-invocation API in `region`.
    pub fn lambda(region: &str) -> Self {
        Self::new("lambda", region, &format!("lambda.{region}.amazonaws.com"))
    }

    /// Signing name of the service, like "lambda".
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scheme used on the wire.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Region the signature is scoped to.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Endpoint the request goes to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
