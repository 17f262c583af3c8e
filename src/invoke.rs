//! Request assembly and invocation.

use std::time::Duration;

use log::debug;

use crate::credential::Credential;
use crate::error::Error;
use crate::error::Result;
use crate::request::Request;
use crate::response::Response;
use crate::service::Service;
use crate::sign;
use crate::sign::SignedRequest;
use crate::time;

/// Bound on one network exchange when the caller does not choose one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`Client`].
pub struct Builder {
    service: Option<Service>,
    credential: Option<Credential>,
    timeout: Duration,
    http_client: Option<reqwest::Client>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            service: None,
            credential: None,
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }
}

impl Builder {
    /// Specify the service to call.
    pub fn service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    /// Specify the credential requests are signed with.
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Bound the whole network exchange. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bring your own HTTP client.
    ///
    /// The client is used as-is, so its configuration, including any timeout,
    /// replaces the builder's.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Use existing information to build a new client.
    ///
    /// The builder should not be used anymore.
    pub fn build(self) -> Result<Client> {
        let service = self
            .service
            .ok_or_else(|| Error::RequestInvalid("service is required".to_string()))?;
        let credential = self
            .credential
            .ok_or_else(|| Error::CredentialInvalid("credential is required".to_string()))?;
        if !credential.is_valid() {
            return Err(Error::CredentialInvalid(
                "access key id and secret access key must be non-empty".to_string(),
            ));
        }
        debug!("client built for service: {service:?}");

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|err| Error::Unexpected(err.into()))?,
        };

        Ok(Client {
            service,
            credential,
            http_client,
        })
    }
}

/// Client signs requests for one service and puts them on the wire.
///
/// Every invocation is an independent pipeline run: it captures its own
/// timestamp and derives its own signing key, so one client can serve any
/// number of concurrent calls without shared state.
#[derive(Clone, Debug)]
pub struct Client {
    service: Service,
    credential: Credential,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a builder.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Sign `req` without sending it.
    ///
    /// Useful for inspecting the exact wire form a call would take.
    pub fn prepare(&self, req: &Request) -> Result<SignedRequest> {
        sign::sign(&self.service, &self.credential, req, time::now())
    }

    /// Sign `req`, send it, and classify the answer.
    ///
    /// A non-success status is surfaced as [`Error::Http`] carrying the exact
    /// status and body the server returned; failing to reach the endpoint at
    /// all is [`Error::Transport`]. Nothing is retried here; retry policy
    /// belongs to the caller.
    pub async fn invoke(&self, req: &Request) -> Result<Response> {
        let signed = self.prepare(req)?;

        let url = reqwest::Url::parse(signed.url()).map_err(|err| {
            Error::RequestInvalid(format!("invalid request url {}: {err}", signed.url()))
        })?;
        debug!(">> request: {} {}", signed.method(), signed.url());
        debug!(">> request headers: {:?}", signed.headers());

        let resp = self
            .http_client
            .request(signed.method().clone(), url)
            .headers(signed.headers().clone())
            .body(signed.body().clone())
            .send()
            .await
            .map_err(Error::transport)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(Error::transport)?;
        debug!("<< response status: {status}");

        if !status.is_success() {
            return Err(Error::Http { status, body });
        }

        let resp = Response::new(status, body);
        debug!("<< response body:\n{}", resp.rendered());
        Ok(resp)
    }
}
