use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use serde_json::Value;
use tokio::runtime::Runtime;
use url::Url;

use crate::auth;
use crate::body::Body;
use crate::capability::TransportCapability;
use crate::config::{AuthConfig, GremlinApiConfig};
use crate::error::ClientError;
use crate::request::{RequestOptions, Verb};
use crate::response::{self, ApiResponse, CallContext, DecodedBody};
use crate::transport::{PreparedRequest, ReqwestTransport, Transport, UnavailableTransport};

/// Which transport a [`GremlinClient`] is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    /// Full-featured client on top of `reqwest`
    Reqwest,
    /// No backend available; every call fails with `NotImplemented`
    Unavailable,
}

/// Pick the client kind for a detected capability.
#[must_use]
pub fn select_client(capability: TransportCapability) -> ClientKind {
    match capability {
        TransportCapability::Available => ClientKind::Reqwest,
        TransportCapability::Unavailable => ClientKind::Unavailable,
    }
}

impl ClientKind {
    fn transport(self, config: &GremlinApiConfig) -> Result<Arc<dyn Transport>, ClientError> {
        let transport: Arc<dyn Transport> = match self {
            ClientKind::Reqwest => Arc::new(ReqwestTransport::new(config.timeout)?),
            ClientKind::Unavailable => Arc::new(UnavailableTransport),
        };
        Ok(transport)
    }
}

/// Gremlin API client: credential headers, verb dispatch and response normalization
pub struct GremlinClient {
    config: GremlinApiConfig,
    transport: Arc<dyn Transport>,
    runtime: OnceLock<Runtime>,
}

impl std::fmt::Debug for GremlinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GremlinClient")
            .field("config", &self.config)
            .field("transport", &self.transport.name())
            .finish_non_exhaustive()
    }
}

impl GremlinClient {
    /// Create client from configuration using the process-wide capability
    ///
    /// Falls back to the unavailable transport when no backend is usable, so
    /// failures surface on the first call.
    ///
    /// # Errors
    /// Returns an error if the selected backend fails to initialize.
    pub fn from_config(config: GremlinApiConfig) -> Result<Self, ClientError> {
        Self::with_kind(config, select_client(TransportCapability::process()))
    }

    /// Like [`from_config`](Self::from_config) but refuses to build a client
    /// without a usable backend.
    ///
    /// # Errors
    /// Returns `ClientError::NotImplemented` if no backend is available.
    pub fn from_config_strict(config: GremlinApiConfig) -> Result<Self, ClientError> {
        match select_client(TransportCapability::process()) {
            ClientKind::Unavailable => {
                let msg = "No usable HTTP transport available in this environment";
                tracing::error!("{msg}");
                Err(ClientError::NotImplemented(msg.to_owned()))
            }
            kind => Self::with_kind(config, kind),
        }
    }

    /// Create client for an explicitly selected kind
    ///
    /// # Errors
    /// Returns an error if the backend fails to initialize.
    pub fn with_kind(config: GremlinApiConfig, kind: ClientKind) -> Result<Self, ClientError> {
        let transport = kind.transport(&config)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Create client on top of a custom transport
    #[must_use]
    pub fn with_transport(config: GremlinApiConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            runtime: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &GremlinApiConfig {
        &self.config
    }

    #[must_use]
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Build the `Authorization` header, `overrides` taking precedence over
    /// the configured credentials field by field.
    ///
    /// # Errors
    /// Returns `ClientError::BadHeader` if no credential is available.
    pub fn header(&self, overrides: &AuthConfig) -> Result<HeaderMap, ClientError> {
        auth::header(&overrides.clone().or(&self.config.auth))
    }

    /// Execute a call against `base_uri + endpoint`
    ///
    /// `verb` is a [`Verb`] or a case-insensitive method name. Exactly one
    /// request is sent; statuses >= 400 come back as `ClientError::Http`.
    ///
    /// # Errors
    /// Returns `UnknownMethod`, `MissingHeaders` or `InvalidUri` before any
    /// network activity, transport errors as reported by the backend, and
    /// `Http` for failure statuses.
    pub async fn api_call<V>(
        &self,
        verb: V,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<(ApiResponse, DecodedBody), ClientError>
    where
        V: TryInto<Verb>,
        V::Error: Into<ClientError>,
    {
        let verb: Verb = verb.try_into().map_err(Into::<ClientError>::into)?;
        let RequestOptions {
            headers,
            body,
            data,
            raw_content,
            query,
        } = options;

        let uri = format!("{}{endpoint}", self.config.base_uri);
        let url = build_url(&uri, &query)?;
        let (headers, body) = select_payload(headers, body, data)?;

        tracing::debug!(
            transport = self.transport.name(),
            verb = %verb,
            uri = %url,
            "dispatching API call"
        );

        let request = PreparedRequest {
            verb,
            url,
            headers,
            body,
        };
        let raw = self.transport.send(&request).await?;

        let ctx = CallContext {
            transport: self.transport.name(),
            verb,
            uri: request.url.as_str(),
            body: &request.body,
            headers: &request.headers,
            query: &query,
            raw_content,
        };
        response::normalize(raw, raw_content, &ctx)
    }

    /// Blocking version of [`api_call`](Self::api_call)
    ///
    /// Drives the call on a private runtime created on first use. The runtime
    /// keeps one worker thread so pooled connections stay polled between
    /// calls and can be reused from other runtimes.
    ///
    /// # Errors
    /// Same as `api_call`, plus `BlockingInAsyncContext` when called from
    /// inside a tokio runtime.
    pub fn api_call_blocking<V>(
        &self,
        verb: V,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<(ApiResponse, DecodedBody), ClientError>
    where
        V: TryInto<Verb>,
        V::Error: Into<ClientError>,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(ClientError::BlockingInAsyncContext);
        }
        self.runtime()?
            .block_on(self.api_call(verb, endpoint, options))
    }

    fn runtime(&self) -> Result<&Runtime, ClientError> {
        if let Some(runtime) = self.runtime.get() {
            return Ok(runtime);
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("gremlinapi-blocking")
            .enable_all()
            .build()?;
        Ok(self.runtime.get_or_init(|| runtime))
    }
}

impl Drop for GremlinClient {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

fn build_url(uri: &str, query: &[(String, String)]) -> Result<Url, ClientError> {
    let mut url = Url::parse(uri).map_err(|e| ClientError::InvalidUri(format!("{uri}: {e}")))?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}

/// Pick the payload: raw `data` first, then JSON `body`, else nothing.
fn select_payload(
    headers: Option<HeaderMap>,
    body: Option<Value>,
    data: Option<Bytes>,
) -> Result<(HeaderMap, Body), ClientError> {
    if let Some(data) = data {
        return Ok((headers.unwrap_or_default(), Body::from_bytes(data)));
    }
    let Some(body) = body else {
        return Ok((headers.unwrap_or_default(), Body::Empty));
    };

    let mut headers = headers.ok_or(ClientError::MissingHeaders)?;
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    let encoded = serde_json::to_vec(&body)?;
    Ok((headers, Body::from_bytes(encoded)))
}
