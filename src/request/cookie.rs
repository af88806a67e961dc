//! Client cookies and their `Cookie` header encoding.
//!
//! # Responsibilities
//! - Describe which cookies the client can encode (`Cookie::encodable`)
//! - Encode a cookie to its `name=value` wire string (lax or strict)
//! - Keep the per-request cookie set in insertion order
//!
//! # Design Decisions
//! - Encodability is a capability of the cookie, not a runtime type check
//! - Replacing a cookie keeps its original position
//! - The header value is the `;`-join of all stored encodings, regenerated on every change

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RequestError, RequestResult};

/// The encodable form of a cookie: what goes into a `Cookie` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodableCookie<'a> {
    pub name: &'a str,
    pub value: &'a str,
    /// Wrap the value in double quotes.
    pub wrap: bool,
}

/// A cookie that may be attached to an outbound request.
pub trait Cookie: fmt::Debug + Send + Sync {
    /// Cookie name; the key the request stores it under.
    fn name(&self) -> &str;

    /// The form the client encoder writes, or `None` if this kind of cookie
    /// cannot be sent from a client.
    fn encodable(&self) -> Option<EncodableCookie<'_>>;
}

impl<T: Cookie + ?Sized> Cookie for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encodable(&self) -> Option<EncodableCookie<'_>> {
        (**self).encodable()
    }
}

impl<T: Cookie + ?Sized> Cookie for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn encodable(&self) -> Option<EncodableCookie<'_>> {
        (**self).encodable()
    }
}

/// A plain client-side cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCookie {
    name: String,
    value: String,
    wrap: bool,
}

impl ClientCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            wrap: false,
        }
    }

    /// Send the value double-quoted.
    pub fn wrapped(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Cookie for ClientCookie {
    fn name(&self) -> &str {
        &self.name
    }

    fn encodable(&self) -> Option<EncodableCookie<'_>> {
        Some(EncodableCookie {
            name: &self.name,
            value: &self.value,
            wrap: self.wrap,
        })
    }
}

/// Encoder for the `Cookie` request header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookieEncoder {
    /// Writes names and values as given.
    #[default]
    Lax,
    /// Rejects names that are not tokens and values outside the RFC 6265 cookie-octet set.
    Strict,
}

impl CookieEncoder {
    /// Encode a cookie to its `name=value` wire string.
    pub fn encode(&self, cookie: &dyn Cookie) -> RequestResult<String> {
        let encodable = cookie
            .encodable()
            .ok_or_else(|| RequestError::UnsupportedCookieKind {
                name: cookie.name().to_string(),
            })?;

        if *self == CookieEncoder::Strict {
            validate_strict(&encodable)?;
        }

        let mut out = String::with_capacity(encodable.name.len() + encodable.value.len() + 3);
        out.push_str(encodable.name);
        out.push('=');
        if encodable.wrap {
            out.push('"');
            out.push_str(encodable.value);
            out.push('"');
        } else {
            out.push_str(encodable.value);
        }
        Ok(out)
    }
}

fn validate_strict(cookie: &EncodableCookie<'_>) -> RequestResult<()> {
    let fail = |reason| RequestError::InvalidCookie {
        name: cookie.name.to_string(),
        reason,
    };

    if cookie.name.is_empty() || !cookie.name.bytes().all(is_name_octet) {
        return Err(fail("invalid character in cookie name"));
    }

    let value = cookie.value;
    let unwrapped = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    };
    if !unwrapped.bytes().all(is_value_octet) {
        return Err(fail("invalid character in cookie value"));
    }
    Ok(())
}

fn is_name_octet(b: u8) -> bool {
    (0x21..0x7f).contains(&b)
        && !matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'@' | b',' | b';' | b':' | b'\\' | b'"' | b'/' | b'[' | b']' | b'?' | b'=' | b'{' | b'}'
        )
}

// cookie-octet = %x21 / %x23-2B / %x2D-3A / %x3C-5B / %x5D-7E
fn is_value_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// Encoded cookies of one request, keyed by name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct CookieSet {
    entries: Vec<(String, String)>,
}

impl CookieSet {
    /// Store an encoded cookie. An existing name keeps its position.
    pub fn put(&mut self, name: &str, encoded: String) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = encoded,
            None => self.entries.push((name.to_string(), encoded)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Encoded values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    /// The `Cookie` header value.
    pub fn header_value(&self) -> String {
        self.values().collect::<Vec<_>>().join(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct ServerOnlyCookie;

    impl Cookie for ServerOnlyCookie {
        fn name(&self) -> &str {
            "server"
        }

        fn encodable(&self) -> Option<EncodableCookie<'_>> {
            None
        }
    }

    #[test]
    fn test_lax_encoding() {
        let encoder = CookieEncoder::Lax;
        assert_eq!(encoder.encode(&ClientCookie::new("s", "1")).unwrap(), "s=1");
        assert_eq!(
            encoder.encode(&ClientCookie::new("s", "a b").wrapped()).unwrap(),
            "s=\"a b\""
        );
        // lax does not validate
        assert_eq!(encoder.encode(&ClientCookie::new("s", "a;b")).unwrap(), "s=a;b");
    }

    #[test]
    fn test_strict_encoding_validates() {
        let encoder = CookieEncoder::Strict;
        assert_eq!(encoder.encode(&ClientCookie::new("id", "abc123")).unwrap(), "id=abc123");
        assert_eq!(encoder.encode(&ClientCookie::new("id", "\"quoted\"")).unwrap(), "id=\"quoted\"");

        let err = encoder.encode(&ClientCookie::new("id", "a;b")).unwrap_err();
        assert!(matches!(err, RequestError::InvalidCookie { .. }));

        let err = encoder.encode(&ClientCookie::new("bad name", "v")).unwrap_err();
        assert!(matches!(err, RequestError::InvalidCookie { .. }));
    }

    #[test]
    fn test_unsupported_cookie_kind() {
        let err = CookieEncoder::Lax.encode(&ServerOnlyCookie).unwrap_err();
        match err {
            RequestError::UnsupportedCookieKind { name } => assert_eq!(name, "server"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cookie_set_keeps_position_on_replace() {
        let mut set = CookieSet::default();
        set.put("a", "a=1".into());
        set.put("b", "b=2".into());
        set.put("c", "c=3".into());
        set.put("a", "a=9".into());

        assert_eq!(set.len(), 3);
        assert_eq!(set.get("a"), Some("a=9"));
        assert_eq!(set.header_value(), "a=9;b=2;c=3");
    }
}
