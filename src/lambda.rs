//! Helpers for the function-invocation API.

use bytes::Bytes;
use http::Method;

use crate::error::Result;
use crate::request::Request;

/// How the endpoint should run the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationType {
    /// Run synchronously and return the function result.
    RequestResponse,
    /// Queue the event and return immediately.
    Event,
    /// Validate permissions and inputs without running the function.
    DryRun,
}

impl InvocationType {
    /// Value of the `x-amz-invocation-type` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationType::RequestResponse => "RequestResponse",
            InvocationType::Event => "Event",
            InvocationType::DryRun => "DryRun",
        }
    }
}

/// Which slice of the execution log to send back with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    /// No log data.
    None,
    /// The last 4 KB of the execution log, base64 encoded.
    Tail,
}

impl LogType {
    /// Value of the `x-amz-log-type` header.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::None => "None",
            LogType::Tail => "Tail",
        }
    }
}

/// Build the request that invokes one function with the given JSON payload.
///
/// `function_name` may be a bare name or a full ARN.
pub fn invoke_function(
    function_name: &str,
    payload: impl Into<Bytes>,
    invocation_type: InvocationType,
    log_type: LogType,
) -> Result<Request> {
    let req = Request::new(
        Method::POST,
        format!("/2015-03-31/functions/{function_name}/invocations"),
    )
    .with_header("x-amz-invocation-type", invocation_type.as_str())?
    .with_header("x-amz-log-type", log_type.as_str())?
    .with_body(payload);

    Ok(req)
}
