//! Sign and invoke AWS-style HTTP APIs without effort.
//!
//! Every call goes through one fixed pipeline: capture a timestamp, build the
//! canonical request, derive a per-request signing key, compute the AWS
//! Signature Version 4 signature, send the signed request, and classify the
//! answer for human inspection.
//!
//! # Example
//!
//! ```no_run
//! use awsinvoke::lambda::{self, InvocationType, LogType};
//! use awsinvoke::load::{CredentialLoad, DefaultLoader};
//! use awsinvoke::{Client, Service};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials come from the environment or ~/.aws/credentials.
//!     let cred = DefaultLoader::default()
//!         .load_credential()?
//!         .ok_or("credentials not found")?;
//!
//!     let client = Client::builder()
//!         .service(Service::lambda("us-east-1"))
//!         .credential(cred)
//!         .build()?;
//!
//!     // Invoke a function synchronously and print the rendered response.
//!     let req = lambda::invoke_function(
//!         "HelloWorld",
//!         r#"{"who":"world"}"#,
//!         InvocationType::RequestResponse,
//!         LogType::Tail,
//!     )?;
//!     let resp = client.invoke(&req).await?;
//!     println!("{}", resp.rendered());
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod credential;
pub use credential::Credential;

mod error;
pub use error::Error;
pub use error::Result;

mod hash;

mod invoke;
pub use invoke::Builder;
pub use invoke::Client;

pub mod lambda;

pub mod load;

mod request;
pub use request::Request;

pub mod response;
pub use response::Response;

mod service;
pub use service::Scheme;
pub use service::Service;

mod sign;
pub use sign::SignedRequest;

mod time;
