use bytes::Bytes;

/// Payload handed to a transport
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    /// No payload is sent
    #[default]
    Empty,
    /// Encoded bytes, sent as-is
    Bytes(Bytes),
}

impl Body {
    /// Create a body from bytes; empty input sends no payload
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        if bytes.is_empty() {
            Body::Empty
        } else {
            Body::Bytes(bytes)
        }
    }

    /// Check if body is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Empty => None,
            Body::Bytes(bytes) => Some(bytes),
        }
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::from_bytes(b)
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::from_bytes(v)
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::from_bytes(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bytes_send_nothing() {
        assert!(Body::from_bytes(Vec::<u8>::new()).is_empty());
        assert_eq!(Body::from(String::new()), Body::Empty);
    }

    #[test]
    fn test_bytes_kept_verbatim() {
        let body = Body::from("raw".to_owned());
        assert_eq!(body.as_bytes(), Some(&Bytes::from_static(b"raw")));
    }
}
