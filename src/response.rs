//! Response capture and diagnostic rendering.

use bytes::Bytes;
use http::StatusCode;
use quick_xml::events::Event;
use quick_xml::Reader;
use quick_xml::Writer;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// What came back from the endpoint: the verbatim answer plus a rendering of
/// the body for human inspection.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    body: Bytes,
    rendered: String,
}

impl Response {
    pub(crate) fn new(status: StatusCode, body: Bytes) -> Self {
        let rendered = render(&body);
        Response {
            status,
            body,
            rendered,
        }
    }

    /// Status code the server returned.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Body bytes, untouched.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body rendered for human inspection, see [`render`].
    pub fn rendered(&self) -> &str {
        &self.rendered
    }
}

/// Render a body for human inspection.
///
/// Bodies starting with `<?xml` are pretty-printed as XML; bodies that parse
/// as JSON are pretty-printed with 4-space indentation; anything else comes
/// back as (lossily decoded) raw text. Rendering never fails: every parse
/// problem falls through to the raw form. The result carries no semantic
/// weight, callers that need the real payload read the bytes.
pub fn render(body: &[u8]) -> String {
    if body.starts_with(b"<?xml") {
        if let Some(pretty) = render_xml(body) {
            return pretty;
        }
    } else if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(pretty) = render_json(&value) {
            return pretty;
        }
    }

    String::from_utf8_lossy(body).into_owned()
}

fn render_json(value: &serde_json::Value) -> Option<String> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser).ok()?;

    String::from_utf8(buf).ok()
}

fn render_xml(body: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => writer.write_event(event).ok()?,
            Err(_) => return None,
        }
    }

    String::from_utf8(writer.into_inner()).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_json_body_renders_with_four_space_indent() {
        let rendered = render(br#"{"b":1,"a":["x","y"]}"#);

        assert_eq!(
            rendered,
            "{\n    \"a\": [\n        \"x\",\n        \"y\"\n    ],\n    \"b\": 1\n}"
        );
    }

    #[test]
    fn test_xml_body_routes_to_xml_rendering() {
        let body =
            br#"<?xml version="1.0"?><Errors><Error><Code>AccessDenied</Code></Error></Errors>"#;
        let rendered = render(body);

        assert!(rendered.starts_with("<?xml"));
        assert!(rendered.contains("\n    <Error>"));
        assert!(rendered.contains("<Code>AccessDenied</Code>"));
    }

    #[test]
    fn test_malformed_xml_falls_back_to_raw_text() {
        let body = br#"<?xml version="1.0"?><Errors></Oops>"#;
        assert_eq!(render(body), String::from_utf8_lossy(body));
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(render(b"access denied"), "access denied");
    }

    #[test]
    fn test_invalid_utf8_never_fails() {
        let rendered = render(&[0xff, 0xfe, 0xfd]);
        assert!(!rendered.is_empty());
    }

    #[test]
    fn test_response_keeps_raw_body_verbatim() {
        let body = Bytes::from_static(br#"{"ok":true}"#);
        let resp = Response::new(StatusCode::OK, body.clone());

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), &body);
        assert_eq!(resp.rendered(), "{\n    \"ok\": true\n}");
    }
}
