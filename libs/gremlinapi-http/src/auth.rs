use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};

use secrecy::ExposeSecret;

use crate::config::AuthConfig;
use crate::error::ClientError;

const BEARER_MARKER: &str = "Bearer";

/// Build the `Authorization` header for the given credentials.
///
/// A bearer token wins over an API key. Tokens that already carry the
/// `Bearer` marker are used verbatim, others get the `Bearer ` prefix. An
/// API key on its own yields `Key <api_key>`.
///
/// # Errors
/// Returns `ClientError::BadHeader` when neither credential is set or the
/// credential is not a valid header value.
pub fn header(auth: &AuthConfig) -> Result<HeaderMap, ClientError> {
    let value = match (auth.api_key_str(), auth.bearer_token_str()) {
        (_, Some(token)) if token.contains(BEARER_MARKER) => token.to_owned(),
        (_, Some(token)) => format!("{BEARER_MARKER} {token}"),
        (Some(api_key), None) => format!("Key {api_key}"),
        (None, None) => {
            // Both are absent or empty in this arm.
            let msg = format!(
                "Missing API Key or Bearer Token, none supplied: {:?}, {:?}",
                auth.api_key.as_ref().map(ExposeSecret::expose_secret),
                auth.bearer_token.as_ref().map(ExposeSecret::expose_secret)
            );
            tracing::error!("{msg}");
            return Err(ClientError::BadHeader(msg));
        }
    };

    let mut value = HeaderValue::from_str(&value).map_err(|_| {
        let msg = "Credential contains characters not allowed in an HTTP header".to_owned();
        tracing::error!("{msg}");
        ClientError::BadHeader(msg)
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::with_capacity(1);
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn authorization(auth: &AuthConfig) -> String {
        let headers = header(auth).unwrap();
        assert_eq!(headers.len(), 1);
        headers[AUTHORIZATION].to_str().unwrap().to_owned()
    }

    #[test]
    fn test_api_key_only() {
        assert_eq!(authorization(&AuthConfig::api_key("abc123")), "Key abc123");
    }

    #[test]
    fn test_bearer_token_gets_prefix() {
        assert_eq!(
            authorization(&AuthConfig::bearer_token("tok")),
            "Bearer tok"
        );
    }

    #[test]
    fn test_bearer_token_with_marker_is_verbatim() {
        assert_eq!(
            authorization(&AuthConfig::bearer_token("Bearer already")),
            "Bearer already"
        );
    }

    #[test]
    fn test_bearer_token_wins_over_api_key() {
        let auth = AuthConfig::api_key("abc123").or(&AuthConfig::bearer_token("tok"));
        assert_eq!(authorization(&auth), "Bearer tok");
    }

    #[test]
    fn test_empty_bearer_token_falls_back_to_api_key() {
        let auth = AuthConfig::api_key("abc123").or(&AuthConfig::bearer_token(""));
        assert_eq!(authorization(&auth), "Key abc123");
    }

    #[test]
    #[traced_test]
    fn test_missing_credentials() {
        let err = header(&AuthConfig::default()).unwrap_err();
        match err {
            ClientError::BadHeader(msg) => assert!(msg.contains("None, None")),
            other => panic!("expected BadHeader, got {other:?}"),
        }
        assert!(logs_contain("Missing API Key or Bearer Token"));
    }

    #[test]
    fn test_missing_credentials_reports_empty_values() {
        let auth = AuthConfig::api_key("");
        let err = header(&auth).unwrap_err();
        match err {
            ClientError::BadHeader(msg) => assert!(msg.ends_with(r#"Some(""), None"#), "{msg}"),
            other => panic!("expected BadHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_header_value() {
        let err = header(&AuthConfig::api_key("line\nbreak")).unwrap_err();
        assert!(matches!(err, ClientError::BadHeader(_)));
    }

    #[test]
    fn test_value_is_sensitive() {
        let headers = header(&AuthConfig::bearer_token("tok")).unwrap();
        assert!(headers[AUTHORIZATION].is_sensitive());
    }
}
