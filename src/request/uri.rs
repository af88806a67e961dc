//! Request URI.
//!
//! # Responsibilities
//! - Hold an absolute or relative URI exactly as the caller wrote it
//! - Split it into scheme, authority, path, query and fragment (RFC 3986 appendix B)
//! - Rebuild it with a replaced query string
//!
//! # Design Decisions
//! - Components are byte ranges into the original string; nothing is re-encoded
//! - Parsing rejects characters that can never appear in a URI, but does not
//!   validate host or port syntax
//! - Full URI semantics (normalization, resolution) live elsewhere

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::{RequestError, RequestResult};

/// An absolute or relative request URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUri {
    raw: String,
    scheme: Option<Range<usize>>,
    authority: Option<Range<usize>>,
    path: Range<usize>,
    query: Option<Range<usize>>,
    fragment: Option<Range<usize>>,
}

impl RequestUri {
    /// Parse a URI string.
    pub fn parse(input: &str) -> RequestResult<Self> {
        if let Some(reason) = check_chars(input) {
            return Err(invalid(input, reason));
        }

        let mut pos = 0;
        let mut scheme = None;
        if let Some(i) = input.find([':', '/', '?', '#']) {
            if input.as_bytes()[i] == b':' {
                if i == 0 {
                    return Err(invalid(input, "expected scheme name"));
                }
                if !is_scheme(&input[..i]) {
                    return Err(invalid(input, "illegal character in scheme name"));
                }
                scheme = Some(0..i);
                pos = i + 1;
            }
        }

        let mut authority = None;
        if input[pos..].starts_with("//") {
            let start = pos + 2;
            let end = find_from(input, start, &['/', '?', '#']);
            authority = Some(start..end);
            pos = end;
        }

        let path_end = find_from(input, pos, &['?', '#']);
        let path = pos..path_end;
        pos = path_end;

        let mut query = None;
        if input[pos..].starts_with('?') {
            let start = pos + 1;
            let end = find_from(input, start, &['#']);
            query = Some(start..end);
            pos = end;
        }

        let fragment = input[pos..].starts_with('#').then(|| pos + 1..input.len());

        Ok(Self {
            raw: input.to_string(),
            scheme,
            authority,
            path,
            query,
            fragment,
        })
    }

    /// The URI exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.clone().map(|r| &self.raw[r])
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.clone().map(|r| &self.raw[r])
    }

    /// Raw (still percent-encoded) path; empty when the URI has none.
    pub fn path(&self) -> &str {
        &self.raw[self.path.clone()]
    }

    /// Raw query string without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.query.clone().map(|r| &self.raw[r])
    }

    /// Raw fragment without the leading `#`.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.clone().map(|r| &self.raw[r])
    }

    /// Returns true if the URI carries a non-empty scheme.
    pub fn is_absolute(&self) -> bool {
        self.scheme().is_some_and(|s| !s.is_empty())
    }

    /// Returns true for URIs with a scheme but no hierarchical part, such as `urn:isbn:1`.
    pub fn is_opaque(&self) -> bool {
        self.is_absolute() && self.authority.is_none() && !self.path().starts_with('/')
    }

    /// Rebuild this URI with `query` in place of the current query string.
    ///
    /// `None` or an empty query drops the `?` entirely. The fragment is kept.
    pub fn with_query(&self, query: Option<&str>) -> RequestResult<Self> {
        let mut out = String::with_capacity(self.raw.len());
        out.push_str(&self.raw[..self.path.end]);
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            out.push('?');
            out.push_str(q);
        }
        if let Some(frag) = self.fragment() {
            out.push('#');
            out.push_str(frag);
        }
        Self::parse(&out)
    }
}

impl fmt::Display for RequestUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for RequestUri {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for RequestUri {
    type Error = RequestError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RequestUri {
    type Error = RequestError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl TryFrom<&String> for RequestUri {
    type Error = RequestError;

    fn try_from(s: &String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

fn invalid(input: &str, reason: &'static str) -> RequestError {
    RequestError::InvalidUri {
        uri: input.to_string(),
        reason,
    }
}

fn find_from(input: &str, start: usize, set: &[char]) -> usize {
    input[start..].find(set).map_or(input.len(), |i| start + i)
}

fn is_scheme(s: &str) -> bool {
    let mut bytes = s.bytes();
    bytes.next().is_some_and(|b| b.is_ascii_alphabetic())
        && bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
}

fn check_chars(input: &str) -> Option<&'static str> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b if b.is_ascii_control() => return Some("control character"),
            b' ' => return Some("whitespace"),
            b'"' | b'<' | b'>' | b'\\' | b'^' | b'`' | b'{' | b'|' | b'}' => {
                return Some("illegal character")
            }
            b'%' => {
                let hex = bytes.get(i + 1..i + 3);
                if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                    return Some("malformed escape pair");
                }
                i += 2;
            }
            _ => {}
        }
        i += 1;
    }
    None
}
