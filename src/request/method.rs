//! HTTP request methods.
//!
//! # Design Decisions
//! - The canonical verb and the raw method token travel together
//! - Non-standard verbs (WebDAV `PROPFIND`, etc.) map to `Custom` and keep their token
//! - Tokens are validated once at construction so the wire method is always valid

use std::fmt;

use crate::error::{RequestError, RequestResult};

/// Canonical HTTP verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Options,
    Get,
    Head,
    Post,
    Put,
    Delete,
    Trace,
    Connect,
    Patch,
    /// Any verb outside the standard set.
    Custom,
}

impl HttpMethod {
    /// Map a method token to its canonical verb.
    ///
    /// Matching is exact: `get` is a custom method, not `GET`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "OPTIONS" => HttpMethod::Options,
            "GET" => HttpMethod::Get,
            "HEAD" => HttpMethod::Head,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "TRACE" => HttpMethod::Trace,
            "CONNECT" => HttpMethod::Connect,
            "PATCH" => HttpMethod::Patch,
            _ => HttpMethod::Custom,
        }
    }

    /// Standard token for this verb, `None` for `Custom`.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            HttpMethod::Options => Some("OPTIONS"),
            HttpMethod::Get => Some("GET"),
            HttpMethod::Head => Some("HEAD"),
            HttpMethod::Post => Some("POST"),
            HttpMethod::Put => Some("PUT"),
            HttpMethod::Delete => Some("DELETE"),
            HttpMethod::Trace => Some("TRACE"),
            HttpMethod::Connect => Some("CONNECT"),
            HttpMethod::Patch => Some("PATCH"),
            HttpMethod::Custom => None,
        }
    }
}

/// A validated method: canonical verb plus the raw token sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMethod {
    method: HttpMethod,
    wire: http::Method,
}

impl RequestMethod {
    /// Build from a standard verb.
    ///
    /// Returns `InvalidMethod` for `Custom`, which has no token of its own.
    pub fn standard(method: HttpMethod) -> RequestResult<Self> {
        let name = method
            .as_str()
            .ok_or_else(|| RequestError::InvalidMethod("CUSTOM".to_string()))?;
        Self::new(method, name)
    }

    /// Build from a raw token, deriving the canonical verb.
    pub fn from_name(name: &str) -> RequestResult<Self> {
        Self::new(HttpMethod::from_name(name), name)
    }

    /// Build from an explicit verb and token.
    ///
    /// For standard verbs the token must match the verb's own name.
    pub fn new(method: HttpMethod, name: &str) -> RequestResult<Self> {
        if let Some(expected) = method.as_str() {
            if expected != name {
                return Err(RequestError::InvalidMethod(name.to_string()));
            }
        }
        if name.is_empty() || !name.bytes().all(is_token_char) {
            return Err(RequestError::InvalidMethod(name.to_string()));
        }
        let wire = http::Method::from_bytes(name.as_bytes())
            .map_err(|_| RequestError::InvalidMethod(name.to_string()))?;
        Ok(Self { method, wire })
    }

    /// The canonical verb.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// The raw token, e.g. `GET` or `PROPFIND`.
    pub fn name(&self) -> &str {
        self.wire.as_str()
    }

    /// The method as sent on the wire.
    pub fn wire(&self) -> &http::Method {
        &self.wire
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// RFC 9110 tchar
fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        )
}
