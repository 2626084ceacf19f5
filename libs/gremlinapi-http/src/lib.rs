//! Gremlin API HTTP transport layer
//!
//! Selects a usable HTTP backend, builds the `Authorization` header,
//! dispatches verbs to the backend and normalizes responses into a
//! `(response, decoded_body)` pair. Failure statuses become
//! [`ClientError::Http`] carrying both.
//!
//! # Examples
//!
//! ## Blocking Usage
//!
//! ```no_run
//! use gremlinapi_http::{AuthConfig, GremlinApiConfig, GremlinClient, RequestOptions, Verb};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GremlinApiConfig::from_env()?;
//! let client = GremlinClient::from_config(config)?;
//!
//! let headers = client.header(&AuthConfig::default())?;
//! let (response, body) = client.api_call_blocking(
//!     Verb::Get,
//!     "/users",
//!     RequestOptions::new().headers(headers).query("teamId", "my-team"),
//! )?;
//! println!("{} {:?}", response.status(), body.as_json());
//! # Ok(())
//! # }
//! ```
//!
//! ## Async Usage
//!
//! ```no_run
//! use gremlinapi_http::{AuthConfig, GremlinApiConfig, GremlinClient, RequestOptions};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GremlinApiConfig::new("https://api.gremlin.com/v1")
//!     .with_auth(AuthConfig::bearer_token("my-token"));
//! let client = GremlinClient::from_config(config)?;
//!
//! let headers = client.header(&AuthConfig::default())?;
//! let options = RequestOptions::new()
//!     .headers(headers)
//!     .json(&json!({"command": {"type": "cpu"}}))?;
//! let (_, body) = client.api_call("POST", "/attacks/new", options).await?;
//! println!("{body:?}");
//! # Ok(())
//! # }
//! ```

mod auth;
mod body;
mod capability;
mod client;
mod config;
mod error;
mod request;
mod response;
mod transport;

// Re-export public API
pub use auth::header;
pub use body::Body;
pub use capability::TransportCapability;
pub use client::{ClientKind, GremlinClient, select_client};
pub use config::{AuthConfig, DEFAULT_BASE_URI, GremlinApiConfig};
pub use error::ClientError;
pub use request::{RequestOptions, Verb};
pub use response::{ApiResponse, DecodedBody};
pub use transport::{PreparedRequest, ReqwestTransport, Transport, UnavailableTransport};

// Re-export commonly used types from dependencies
pub use http::{HeaderMap, StatusCode};
