//! Time related utils.

/// UTC timestamp shared by every stage of one pipeline run.
pub(crate) type DateTime = chrono::DateTime<chrono::Utc>;

/// Capture the current UTC time.
///
/// Taken exactly once per invocation; the credential scope date and the
/// key-derivation date both come from this single capture, which is what
/// keeps them on the same calendar day.
pub(crate) fn now() -> DateTime {
    chrono::Utc::now()
}

/// Format a timestamp as the credential-scope date stamp: "20220313".
pub(crate) fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a timestamp for the `x-amz-date` header: "20220313T072004Z".
pub(crate) fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}
