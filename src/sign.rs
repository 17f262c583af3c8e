//! AWS Signature Version 4 signing.
//!
//! - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Write;

use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::header::HOST;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use log::debug;
use percent_encoding::utf8_percent_encode;

use crate::constants::QUERY_ENCODE_SET;
use crate::constants::X_AMZ_CONTENT_SHA_256;
use crate::constants::X_AMZ_DATE;
use crate::credential::Credential;
use crate::error::Error;
use crate::error::Result;
use crate::hash::hex_hmac_sha256;
use crate::hash::hex_sha256;
use crate::hash::hmac_sha256;
use crate::request::Request;
use crate::service::Service;
use crate::time::format_date;
use crate::time::format_iso8601;
use crate::time::DateTime;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// A fully signed request: final header set, wire URL and body bytes.
///
/// The URL carries the exact query string that was canonicalized; signing it
/// one way and sending it another is the classic way to break a signature.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    method: Method,
    url: String,
    headers: HeaderMap,
    body: Bytes,
}

impl SignedRequest {
    /// HTTP method of the wire request.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request URL, query string included.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Final header set, `authorization` included.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body bytes that go on the wire.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Sign `req` against `service` with `cred`, stamping every stage with `now`.
pub(crate) fn sign(
    service: &Service,
    cred: &Credential,
    req: &Request,
    now: DateTime,
) -> Result<SignedRequest> {
    if !cred.is_valid() {
        return Err(Error::CredentialInvalid(
            "access key id and secret access key must be non-empty".to_string(),
        ));
    }

    let mut creq = CanonicalRequest::build(service, req, now)?;
    debug!("calculated canonical request:\n{creq}");

    // Scope: "20220313/<region>/<service>/aws4_request"
    let scope = format!(
        "{}/{}/{}/aws4_request",
        format_date(now),
        service.region(),
        service.name()
    );

    // StringToSign:
    //
    // AWS4-HMAC-SHA256
    // 20220313T072004Z
    // 20220313/<region>/<service>/aws4_request
    // <hashed_canonical_request>
    let string_to_sign = {
        let mut f = String::new();
        writeln!(f, "{ALGORITHM}")?;
        writeln!(f, "{}", format_iso8601(now))?;
        writeln!(f, "{}", &scope)?;
        write!(f, "{}", hex_sha256(creq.to_string().as_bytes()))?;
        f
    };
    debug!("calculated string to sign: {string_to_sign}");

    let signing_key = derive_signing_key(
        cred.secret_access_key(),
        &format_date(now),
        service.region(),
        service.name(),
    )?;
    let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

    let mut authorization = HeaderValue::from_str(&format!(
        "{ALGORITHM} Credential={}/{}, SignedHeaders={}, Signature={}",
        cred.access_key_id(),
        scope,
        creq.signed_headers().join(";"),
        signature,
    ))?;
    authorization.set_sensitive(true);
    creq.headers.insert(AUTHORIZATION, authorization);

    let url = if creq.query.is_empty() {
        format!("{}://{}{}", service.scheme(), service.endpoint(), creq.path)
    } else {
        format!(
            "{}://{}{}?{}",
            service.scheme(),
            service.endpoint(),
            creq.path,
            creq.query
        )
    };

    Ok(SignedRequest {
        method: creq.method,
        url,
        headers: creq.headers,
        body: req.payload(),
    })
}

/// Derive the per-request signing key.
///
/// Four chained HMAC-SHA256 steps scope the long-term secret to one calendar
/// day, one region and one service; each digest keys the next step as raw
/// bytes. The key is recomputed for every request, never cached.
pub(crate) fn derive_signing_key(
    secret: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Result<Vec<u8>> {
    if secret.is_empty() {
        return Err(Error::CredentialInvalid(
            "secret access key must not be empty".to_string(),
        ));
    }

    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    Ok(hmac_sha256(&k_service, b"aws4_request"))
}

/// The derived, order-sensitive form both sides hash and sign.
struct CanonicalRequest {
    method: Method,
    path: String,
    query: String,
    headers: HeaderMap,
    payload_hash: String,
}

impl CanonicalRequest {
    fn build(service: &Service, req: &Request, now: DateTime) -> Result<Self> {
        let payload_hash = hex_sha256(&req.payload());

        // host, x-amz-content-sha256 and x-amz-date must land before
        // canonicalization so they end up inside the signature.
        let mut headers = req.headers().clone();
        headers.insert(HOST, HeaderValue::try_from(service.endpoint())?);
        headers.insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(&payload_hash)?);
        headers.insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

        Ok(CanonicalRequest {
            method: req.method().clone(),
            path: req.path().to_string(),
            query: canonical_query_string(req.query()),
            headers,
            payload_hash,
        })
    }

    /// Lowercased header names in ascending order; the canonical header block
    /// enumerates exactly this set in exactly this order.
    fn signed_headers(&self) -> Vec<&str> {
        let mut signed_headers = self.headers.keys().map(|v| v.as_str()).collect::<Vec<_>>();
        signed_headers.sort_unstable();

        signed_headers
    }
}

impl Display for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.path)?;
        writeln!(f, "{}", self.query)?;

        let signed_headers = self.signed_headers();
        for header in signed_headers.iter() {
            let value = &self.headers[*header];
            writeln!(
                f,
                "{}:{}",
                header,
                value.to_str().expect("header value must be valid")
            )?;
        }
        writeln!(f)?;
        writeln!(f, "{}", signed_headers.join(";"))?;
        write!(f, "{}", self.payload_hash)
    }
}

/// Join query parameters into the canonical string.
///
/// Keys pass through verbatim in ascending order; values are percent-encoded
/// with [`QUERY_ENCODE_SET`].
fn canonical_query_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={}", utf8_percent_encode(v, &QUERY_ENCODE_SET)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_time() -> DateTime {
        chrono::Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
    }

    fn test_service() -> Service {
        Service::new("lambda", "us-east-1", "lambda.us-east-1.amazonaws.com")
    }

    fn test_credential() -> Credential {
        Credential::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY")
    }

    fn test_invocation_request() -> Request {
        Request::post("/2015-03-31/functions/HelloWorld/invocations")
            .with_header("x-amz-invocation-type", "RequestResponse")
            .expect("header must be valid")
            .with_header("x-amz-log-type", "Tail")
            .expect("header must be valid")
            .with_body(r#"{"who":"world"}"#)
    }

    #[test]
    fn test_derive_signing_key() {
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY",
            "20150830",
            "us-east-1",
            "iam",
        )
        .expect("key derivation must succeed");

        assert_eq!(
            hex::encode(key),
            "2c94c0cf5378ada6887f09bb697df8fc0affdb34ba1cdd5bda32b664bd55b73c"
        );
    }

    #[test]
    fn test_derive_signing_key_rejects_empty_secret() {
        let err = derive_signing_key("", "20150830", "us-east-1", "iam").unwrap_err();
        assert!(matches!(err, Error::CredentialInvalid(_)));
    }

    #[test]
    fn test_canonical_request_for_invocation() {
        let creq =
            CanonicalRequest::build(&test_service(), &test_invocation_request(), test_time())
                .expect("canonical request must build");

        assert_eq!(
            creq.to_string(),
            "POST\n\
             /2015-03-31/functions/HelloWorld/invocations\n\
             \n\
             host:lambda.us-east-1.amazonaws.com\n\
             x-amz-content-sha256:e56b702bb0e37671b16291ba0fdf1777965c23c5094aec61f9e98ddd7df2da48\n\
             x-amz-date:20150830T123600Z\n\
             x-amz-invocation-type:RequestResponse\n\
             x-amz-log-type:Tail\n\
             \n\
             host;x-amz-content-sha256;x-amz-date;x-amz-invocation-type;x-amz-log-type\n\
             e56b702bb0e37671b16291ba0fdf1777965c23c5094aec61f9e98ddd7df2da48"
        );
    }

    #[test]
    fn test_canonical_and_signed_headers_enumerate_the_same_set() {
        let creq = CanonicalRequest {
            method: Method::GET,
            path: "/".to_string(),
            query: String::new(),
            headers: {
                let mut headers = HeaderMap::new();
                headers.insert(HOST, HeaderValue::from_static("x"));
                headers.insert(X_AMZ_DATE, HeaderValue::from_static("y"));
                headers
            },
            payload_hash: hex_sha256(b""),
        };

        assert_eq!(creq.signed_headers().join(";"), "host;x-amz-date");
        let rendered = creq.to_string();
        assert!(rendered.contains("host:x\nx-amz-date:y\n\nhost;x-amz-date\n"));
    }

    #[test]
    fn test_signature_and_authorization_header() {
        let signed = sign(
            &test_service(),
            &test_credential(),
            &test_invocation_request(),
            test_time(),
        )
        .expect("signing must succeed");

        assert_eq!(
            signed.url(),
            "https://lambda.us-east-1.amazonaws.com/2015-03-31/functions/HelloWorld/invocations"
        );
        assert_eq!(
            signed.headers()[AUTHORIZATION].to_str().unwrap(),
            "AWS4-HMAC-SHA256 \
             Credential=AKIDEXAMPLE/20150830/us-east-1/lambda/aws4_request, \
             SignedHeaders=host;x-amz-content-sha256;x-amz-date;x-amz-invocation-type;x-amz-log-type, \
             Signature=f4d1b88d34fca2f12405323df240441ed70a5193cf7d63ed8ccf551c2a02cb65"
        );
        assert_eq!(signed.headers()[X_AMZ_DATE], "20150830T123600Z");
        assert_eq!(signed.body(), &Bytes::from(r#"{"who":"world"}"#));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let service = test_service();
        let cred = test_credential();
        let req = test_invocation_request();

        let a = sign(&service, &cred, &req, test_time()).expect("signing must succeed");
        let b = sign(&service, &cred, &req, test_time()).expect("signing must succeed");

        assert_eq!(a.url(), b.url());
        assert_eq!(a.headers(), b.headers());
        assert_eq!(a.body(), b.body());
    }

    #[test]
    fn test_get_with_query() {
        let req = Request::get("/2015-03-31/functions/")
            .with_query("MaxItems", "20")
            .with_query("Marker", "a b/c")
            .with_query("FunctionVersion", "ALL")
            .with_body("ignored on GET");

        let signed = sign(&test_service(), &test_credential(), &req, test_time())
            .expect("signing must succeed");

        // Wire URL carries the canonical query string byte for byte.
        assert_eq!(
            signed.url(),
            "https://lambda.us-east-1.amazonaws.com/2015-03-31/functions/\
             ?FunctionVersion=ALL&Marker=a%20b%2Fc&MaxItems=20"
        );
        assert_eq!(
            signed.headers()[X_AMZ_CONTENT_SHA_256],
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        let authorization = signed.headers()[AUTHORIZATION].to_str().unwrap();
        assert!(authorization
            .ends_with("Signature=e490eebb70e26b847c88f818f40d923525df597d0cb39173a46489040d12212c"));
    }

    #[test]
    fn test_canonical_query_string_is_idempotent() {
        let mut params = BTreeMap::new();
        params.insert("FunctionVersion".to_string(), "ALL".to_string());
        params.insert("Marker".to_string(), "a b/c".to_string());
        params.insert("MaxItems".to_string(), "20".to_string());

        let canonical = canonical_query_string(&params);
        assert_eq!(canonical, "FunctionVersion=ALL&Marker=a%20b%2Fc&MaxItems=20");

        // Parse the canonical form back into parameters and canonicalize
        // again; the round trip must not change a byte.
        let reparsed: BTreeMap<String, String> = form_urlencoded::parse(canonical.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(canonical_query_string(&reparsed), canonical);
    }

    #[test]
    fn test_empty_credential_rejected_before_signing() {
        let err = sign(
            &test_service(),
            &Credential::new("AKIDEXAMPLE", ""),
            &test_invocation_request(),
            test_time(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::CredentialInvalid(_)));
    }
}
