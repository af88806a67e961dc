//! The mutable outbound request.
//!
//! # Responsibilities
//! - Accumulate method, URI, headers, cookies, attributes and body
//! - Derive query parameters lazily from the URI
//! - Keep the `Cookie` header in step with the cookie set
//!
//! # Design Decisions
//! - Method and URI are fixed at construction; the URI can be replaced later
//! - Replacing the URI swaps in a fresh derived-state slot; cached parameters are never patched
//! - Cookie operations are atomic: on error, cookies and headers are unchanged
//! - No internal locking except around the one-time parameter decode

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, COOKIE};
use http::HeaderMap;

use super::attributes::Attributes;
use super::body::{AnyValue, Body, BodyValue, ChunkStream};
use super::cache::Derived;
use super::convert::{ConversionService, StandardConversions};
use super::cookie::{Cookie, CookieEncoder, CookieSet};
use super::method::{HttpMethod, RequestMethod};
use super::parameters::{Parameters, ParametersMut, QueryOptions};
use super::uri::RequestUri;
use crate::error::{RequestError, RequestResult};
use crate::observability::metrics;

/// A request under construction.
#[derive(Debug, Clone)]
pub struct Request {
    method: RequestMethod,
    uri: RequestUri,
    headers: HeaderMap,
    cookies: CookieSet,
    cookie_encoder: CookieEncoder,
    attributes: Attributes,
    body: Body,
    parameters: Derived<Parameters>,
    query_options: QueryOptions,
    conversions: Arc<dyn ConversionService>,
}

/// Constructors
impl Request {
    /// Create a request with a standard verb.
    pub fn new<U>(method: HttpMethod, uri: U) -> RequestResult<Self>
    where
        U: TryInto<RequestUri, Error = RequestError>,
    {
        Ok(Self::from_parts(RequestMethod::standard(method)?, uri.try_into()?))
    }

    /// Create a request with a raw method token, standard or not.
    pub fn custom<U>(method_name: &str, uri: U) -> RequestResult<Self>
    where
        U: TryInto<RequestUri, Error = RequestError>,
    {
        Ok(Self::from_parts(RequestMethod::from_name(method_name)?, uri.try_into()?))
    }

    pub fn get<U>(uri: U) -> RequestResult<Self>
    where
        U: TryInto<RequestUri, Error = RequestError>,
    {
        Self::new(HttpMethod::Get, uri)
    }

    pub fn post<U>(uri: U) -> RequestResult<Self>
    where
        U: TryInto<RequestUri, Error = RequestError>,
    {
        Self::new(HttpMethod::Post, uri)
    }

    /// Create a request from an already validated method and URI.
    pub fn from_parts(method: RequestMethod, uri: RequestUri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            cookies: CookieSet::default(),
            cookie_encoder: CookieEncoder::default(),
            attributes: Attributes::new(),
            body: Body::Empty,
            parameters: Derived::new(),
            query_options: QueryOptions::default(),
            conversions: Arc::new(StandardConversions),
        }
    }
}

// ===== Method & URI =====

impl Request {
    /// The canonical verb; `Custom` for non-standard methods.
    pub fn method(&self) -> HttpMethod {
        self.method.method()
    }

    /// The raw method token, e.g. `GET` or `PROPFIND`.
    pub fn method_name(&self) -> &str {
        self.method.name()
    }

    pub fn request_method(&self) -> &RequestMethod {
        &self.method
    }

    pub fn uri(&self) -> &RequestUri {
        &self.uri
    }

    /// Replace the URI. Cached parameters are discarded and decoded again on next access.
    pub fn set_uri(&mut self, uri: RequestUri) -> &mut Self {
        self.uri = uri;
        self.parameters = Derived::new();
        self
    }

    /// Parse and replace the URI.
    pub fn try_set_uri<U>(&mut self, uri: U) -> RequestResult<&mut Self>
    where
        U: TryInto<RequestUri, Error = RequestError>,
    {
        let uri = uri.try_into()?;
        Ok(self.set_uri(uri))
    }
}

// ===== Parameters =====

impl Request {
    /// Query parameters decoded from the current URI.
    ///
    /// The first call decodes; later calls (from any thread) return the same
    /// instance until the URI is replaced.
    pub fn parameters(&self) -> Arc<Parameters> {
        self.parameters.get_or_compute(|| {
            let params = Parameters::decode(self.uri.query(), &self.query_options);
            metrics::record_parameter_decode();
            tracing::trace!(uri = %self.uri, count = params.len(), "Decoded query parameters");
            params
        })
    }

    /// Write access to the query parameters. Writes rewrite the URI.
    pub fn parameters_mut(&mut self) -> ParametersMut<'_> {
        ParametersMut::new(self)
    }

    pub fn query_options(&self) -> &QueryOptions {
        &self.query_options
    }

    pub fn set_query_options(&mut self, options: QueryOptions) -> &mut Self {
        self.query_options = options;
        self.parameters = Derived::new();
        self
    }
}

// ===== Headers =====

impl Request {
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Set a header, replacing existing values.
    pub fn header(&mut self, name: &str, value: &str) -> RequestResult<&mut Self> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Add a header value, keeping existing values.
    pub fn append_header(&mut self, name: &str, value: &str) -> RequestResult<&mut Self> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.headers.append(name, value);
        Ok(self)
    }
}

// ===== Cookies =====

impl Request {
    /// Add a cookie, replacing any cookie with the same name, and regenerate
    /// the `Cookie` header.
    pub fn add_cookie(&mut self, cookie: &dyn Cookie) -> RequestResult<&mut Self> {
        let encoded = self.cookie_encoder.encode(cookie)?;
        let mut cookies = self.cookies.clone();
        cookies.put(cookie.name(), encoded);
        self.commit_cookies(cookies)?;
        Ok(self)
    }

    /// Add several cookies, regenerating the `Cookie` header once.
    ///
    /// Every cookie is encoded before any is stored, so one bad cookie leaves
    /// the request unchanged.
    pub fn add_cookies<C, I>(&mut self, cookies: I) -> RequestResult<&mut Self>
    where
        C: Cookie,
        I: IntoIterator<Item = C>,
    {
        let cookies: Vec<C> = cookies.into_iter().collect();
        match cookies.as_slice() {
            [] => Ok(self),
            [single] => self.add_cookie(single),
            many => {
                let mut next = self.cookies.clone();
                for cookie in many {
                    let encoded = self.cookie_encoder.encode(cookie)?;
                    next.put(cookie.name(), encoded);
                }
                self.commit_cookies(next)?;
                Ok(self)
            }
        }
    }

    /// Remove all cookies and the `Cookie` header.
    pub fn clear_cookies(&mut self) -> &mut Self {
        self.cookies.clear();
        self.headers.remove(COOKIE);
        self
    }

    /// Encoded cookie values in insertion order.
    pub fn cookie_values(&self) -> impl Iterator<Item = &str> {
        self.cookies.values()
    }

    /// Encoded value of the cookie called `name`.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name)
    }

    pub fn cookie_encoder(&self) -> CookieEncoder {
        self.cookie_encoder
    }

    /// Encoder used by later cookie additions. Stored cookies are not re-encoded.
    pub fn set_cookie_encoder(&mut self, encoder: CookieEncoder) -> &mut Self {
        self.cookie_encoder = encoder;
        self
    }

    fn commit_cookies(&mut self, cookies: CookieSet) -> RequestResult<()> {
        let value = HeaderValue::from_str(&cookies.header_value())?;
        self.headers.insert(COOKIE, value);
        self.cookies = cookies;
        Ok(())
    }
}

// ===== Body =====

impl Request {
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Replace the body with any representation.
    pub fn set_body(&mut self, body: Body) -> &mut Self {
        self.body = body;
        self
    }

    /// Replace the body with raw payload bytes.
    pub fn set_bytes(&mut self, bytes: impl Into<Bytes>) -> &mut Self {
        self.set_body(Body::Full(BodyValue::Bytes(bytes.into())))
    }

    /// Replace the body with an in-memory value.
    ///
    /// A `Bytes` value is stored as raw payload.
    pub fn set_value<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        let value = match (&value as &dyn Any).downcast_ref::<Bytes>() {
            Some(bytes) => BodyValue::Bytes(bytes.clone()),
            None => BodyValue::Value(AnyValue::new(value)),
        };
        self.set_body(Body::Full(value))
    }

    /// Replace the body with a lazy chunk sequence.
    pub fn set_chunks(&mut self, chunks: ChunkStream) -> &mut Self {
        self.set_body(Body::Streaming(chunks))
    }

    /// Remove the body.
    pub fn clear_body(&mut self) -> &mut Self {
        self.set_body(Body::Empty)
    }

    /// Returns true if the body is a chunk sequence.
    pub fn is_streaming(&self) -> bool {
        self.body.is_streaming()
    }

    /// The in-memory body as a `T`.
    ///
    /// A stored `T` is returned directly; otherwise the conversion service is
    /// asked. An absent or streaming body, or a missing conversion, yields `None`.
    pub fn body_as<T: Any + Clone>(&self) -> Option<T> {
        let value = self.body.value()?;
        if let Some(direct) = value.downcast_ref::<T>() {
            return Some(direct.clone());
        }
        self.conversions
            .convert(value, TypeId::of::<T>())
            .and_then(|converted| converted.downcast::<T>().ok())
            .map(|converted| *converted)
    }

    pub fn set_conversion_service(&mut self, service: Arc<dyn ConversionService>) -> &mut Self {
        self.conversions = service;
        self
    }
}

// ===== Attributes =====

impl Request {
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Attribute `name` as a `T`.
    pub fn attribute<T: Any>(&self, name: &str) -> Option<&T> {
        self.attributes.get(name)
    }

    pub fn set_attribute<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) -> &mut Self {
        self.attributes.insert(name, value);
        self
    }
}

/// Renders as `<METHOD> <URI>`.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method_name(), self.uri)
    }
}
