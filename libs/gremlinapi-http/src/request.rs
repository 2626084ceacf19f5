use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;

/// HTTP verbs the Gremlin API is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Head,
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Verb {
    pub const ALL: [Verb; 6] = [
        Verb::Head,
        Verb::Get,
        Verb::Post,
        Verb::Put,
        Verb::Delete,
        Verb::Patch,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Head => "HEAD",
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
            Verb::Patch => "PATCH",
        }
    }

    /// The `http` method a transport sends for this verb.
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Verb::Head => Method::HEAD,
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
            Verb::Patch => Method::PATCH,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse; any other name is rejected before a call is made.
impl FromStr for Verb {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ClientError::UnknownMethod(s.to_owned()))
    }
}

impl TryFrom<&str> for Verb {
    type Error = ClientError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Per-call options for [`GremlinClient::api_call`](crate::GremlinClient::api_call)
///
/// `data` is sent verbatim and wins over `body`, which is JSON-encoded.
#[derive(Debug, Default, Clone)]
pub struct RequestOptions {
    pub(crate) headers: Option<HeaderMap>,
    pub(crate) body: Option<Value>,
    pub(crate) data: Option<Bytes>,
    pub(crate) raw_content: bool,
    pub(crate) query: Vec<(String, String)>,
}

impl RequestOptions {
    /// Create empty options: no headers, no payload, decoded response
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `headers` as the outgoing header map
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Add a single header, creating the header map if needed
    ///
    /// # Errors
    /// Returns `ClientError::BadHeader` if the name or value is not valid HTTP.
    pub fn header<K, V>(mut self, key: K, value: V) -> Result<Self, ClientError>
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: fmt::Display,
        V::Error: fmt::Display,
    {
        let key = key
            .try_into()
            .map_err(|e| ClientError::BadHeader(format!("Invalid header name: {e}")))?;
        let value = value
            .try_into()
            .map_err(|e| ClientError::BadHeader(format!("Invalid header value: {e}")))?;
        self.headers.get_or_insert_with(HeaderMap::new).insert(key, value);
        Ok(self)
    }

    /// Set a structured body to be JSON-encoded at dispatch
    ///
    /// # Errors
    /// Returns `ClientError::Serialization` if `value` cannot be represented as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_value(value)?);
        Ok(self)
    }

    /// Set a structured body from an already built JSON value
    #[must_use]
    pub fn body(mut self, value: Value) -> Self {
        self.body = Some(value);
        self
    }

    /// Set a pre-encoded payload that is sent unmodified
    #[must_use]
    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Return the undecoded response bytes instead of JSON or text
    #[must_use]
    pub fn raw_content(mut self, raw: bool) -> Self {
        self.raw_content = raw;
        self
    }

    /// Append a query string parameter
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}
