use std::time::Duration;

use async_trait::async_trait;
use http::HeaderMap;
use url::Url;

use crate::body::Body;
use crate::error::ClientError;
use crate::request::Verb;
use crate::response::ApiResponse;

/// A fully resolved call, ready to be put on the wire
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub verb: Verb,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Body,
}

/// Backend that performs exactly one HTTP exchange per `send`
///
/// Transport-level failures are returned as-is; status codes are not
/// interpreted here.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short backend name used in log lines.
    fn name(&self) -> &'static str;

    async fn send(&self, request: &PreparedRequest) -> Result<ApiResponse, ClientError>;
}

/// Transport backed by `reqwest`
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new reqwest transport
    ///
    /// # Errors
    /// Returns an error if the HTTP backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &'static str {
        "reqwest"
    }

    async fn send(&self, request: &PreparedRequest) -> Result<ApiResponse, ClientError> {
        let mut req_builder = self
            .http_client
            .request(request.verb.method(), request.url.clone())
            .headers(request.headers.clone());

        req_builder = match &request.body {
            Body::Empty => req_builder,
            Body::Bytes(bytes) => req_builder.body(bytes.clone()),
        };

        let resp = req_builder.send().await?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let url = resp.url().to_string();
        let content = resp.bytes().await?;

        Ok(ApiResponse::new(status, headers, url, content))
    }
}

/// Stand-in selected when no HTTP backend is usable; every call fails
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableTransport;

#[async_trait]
impl Transport for UnavailableTransport {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn send(&self, _request: &PreparedRequest) -> Result<ApiResponse, ClientError> {
        let msg =
            "This function is not yet implemented, no usable HTTP transport in this environment";
        tracing::error!("{msg}");
        Err(ClientError::NotImplemented(msg.to_owned()))
    }
}
