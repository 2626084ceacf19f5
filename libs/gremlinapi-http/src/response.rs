use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::body::Body;
use crate::error::ClientError;
use crate::request::Verb;

/// Buffered response as returned by a transport
///
/// Handed back to the caller untouched next to its [`DecodedBody`].
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    url: String,
    content: Bytes,
}

impl ApiResponse {
    /// Create a response from components
    #[must_use]
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        url: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            status,
            headers,
            url: url.into(),
            content: content.into(),
        }
    }

    /// Get the HTTP status code
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the response headers
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL the response came from
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Undecoded response bytes
    #[must_use]
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Charset declared in the `Content-Type` header, lowercased.
    #[must_use]
    pub fn encoding(&self) -> Option<String> {
        let content_type = self.headers.get(CONTENT_TYPE)?.to_str().ok()?;
        let parsed: mime::Mime = content_type.parse().ok()?;
        parsed
            .get_param(mime::CHARSET)
            .map(|charset| charset.as_str().to_ascii_lowercase())
    }

    /// Body decoded with the declared charset. Never fails.
    #[must_use]
    pub fn text(&self) -> String {
        decode_text(&self.content, self.encoding().as_deref())
    }
}

/// Response payload after content-type-aware interpretation
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    Json(Value),
    Text(String),
    Bytes(Bytes),
}

impl DecodedBody {
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            DecodedBody::Json(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedBody::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            DecodedBody::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Deserialize a JSON body into `T`
    ///
    /// # Errors
    /// Returns `ClientError::Serialization` if the body is not JSON or does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        match self {
            DecodedBody::Json(value) => Ok(T::deserialize(value)?),
            DecodedBody::Text(text) => Ok(serde_json::from_str(text)?),
            DecodedBody::Bytes(bytes) => Ok(serde_json::from_slice(bytes)?),
        }
    }
}

/// What was sent, kept for the failure log line.
#[derive(Debug)]
pub(crate) struct CallContext<'a> {
    pub transport: &'static str,
    pub verb: Verb,
    pub uri: &'a str,
    pub body: &'a Body,
    pub headers: &'a HeaderMap,
    pub query: &'a [(String, String)],
    pub raw_content: bool,
}

/// Decode a transport response and turn failure statuses into errors.
pub(crate) fn normalize(
    response: ApiResponse,
    raw_content: bool,
    ctx: &CallContext<'_>,
) -> Result<(ApiResponse, DecodedBody), ClientError> {
    let body = decode(&response, raw_content);

    if response.status().as_u16() >= 400 {
        let header_names: Vec<&str> = ctx.headers.keys().map(http::HeaderName::as_str).collect();
        tracing::debug!(
            transport = ctx.transport,
            verb = %ctx.verb,
            uri = ctx.uri,
            payload = %payload_for_log(ctx.body),
            headers = ?header_names,
            query = ?ctx.query,
            raw_content = ctx.raw_content,
            status = response.status().as_u16(),
            "API call failed"
        );
        return Err(ClientError::Http {
            response: Box::new(response),
            body,
        });
    }

    Ok((response, body))
}

fn decode(response: &ApiResponse, raw_content: bool) -> DecodedBody {
    if raw_content {
        return DecodedBody::Bytes(response.content().clone());
    }
    match serde_json::from_slice(response.content()) {
        Ok(value) => DecodedBody::Json(value),
        Err(e) => {
            tracing::trace!(error = %e, "response body is not JSON, decoding as text");
            DecodedBody::Text(response.text())
        }
    }
}

fn decode_text(content: &[u8], charset: Option<&str>) -> String {
    match charset {
        Some("iso-8859-1" | "latin1" | "latin-1") => {
            content.iter().copied().map(char::from).collect()
        }
        _ => String::from_utf8_lossy(content).into_owned(),
    }
}

fn payload_for_log(body: &Body) -> String {
    body.as_bytes()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;

    fn response(
        status: u16,
        content_type: Option<&'static str>,
        content: &'static [u8],
    ) -> ApiResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        ApiResponse::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            "http://localhost/v1/test",
            Bytes::from_static(content),
        )
    }

    fn run(
        resp: ApiResponse,
        raw_content: bool,
    ) -> Result<(ApiResponse, DecodedBody), ClientError> {
        let headers = HeaderMap::new();
        let ctx = CallContext {
            transport: "test",
            verb: Verb::Get,
            uri: "http://localhost/v1/test",
            body: &Body::Empty,
            headers: &headers,
            query: &[],
            raw_content,
        };
        normalize(resp, raw_content, &ctx)
    }

    #[test]
    fn test_json_body_decoded() {
        let resp = response(200, Some("application/json"), br#"{"ok":true}"#);
        let (resp, body) = run(resp, false).unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body, DecodedBody::Json(json!({"ok": true})));
    }

    #[test]
    fn test_non_json_body_falls_back_to_text() {
        let resp = response(200, Some("text/plain; charset=utf-8"), b"plain old text");
        let (_, body) = run(resp, false).unwrap();
        assert_eq!(body.as_text(), Some("plain old text"));
    }

    #[test]
    fn test_empty_body_is_empty_text() {
        let resp = response(204, None, b"");
        let (_, body) = run(resp, false).unwrap();
        assert_eq!(body, DecodedBody::Text(String::new()));
    }

    #[test]
    fn test_latin1_charset() {
        let resp = response(200, Some("text/plain; charset=ISO-8859-1"), b"caf\xe9");
        assert_eq!(resp.encoding().as_deref(), Some("iso-8859-1"));
        assert_eq!(resp.text(), "caf\u{e9}");
    }

    #[test]
    fn test_invalid_utf8_does_not_fail() {
        let resp = response(200, None, b"\xff\xfe");
        let (_, body) = run(resp, false).unwrap();
        assert!(body.as_text().is_some());
    }

    #[test]
    fn test_raw_content_untouched() {
        let resp = response(200, Some("application/json"), br#"{"ok":true}"#);
        let (_, body) = run(resp, true).unwrap();
        assert_eq!(&body.as_bytes().unwrap()[..], br#"{"ok":true}"#);
    }

    #[test]
    fn test_error_status_carries_response_and_body() {
        let resp = response(404, Some("application/json"), br#"{"error":"missing"}"#);
        let err = run(resp, false).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.body(), Some(&DecodedBody::Json(json!({"error": "missing"}))));
        match err {
            ClientError::Http { response, .. } => {
                assert_eq!(response.url(), "http://localhost/v1/test");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn test_status_399_is_success() {
        let resp = response(399, None, b"");
        assert!(run(resp, false).is_ok());
    }

    #[test]
    fn test_deserialize_json_body() {
        #[derive(serde::Deserialize)]
        struct Team {
            id: String,
        }
        let body = DecodedBody::Json(json!({"id": "team-1"}));
        let team: Team = body.deserialize().unwrap();
        assert_eq!(team.id, "team-1");
    }
}
