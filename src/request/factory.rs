//! Request creation with configured defaults.
//!
//! # Responsibilities
//! - Apply default headers and the user agent to each new request
//! - Stamp a unique `x-request-id` when enabled
//! - Carry the configured cookie encoder and query decoding options
//!
//! # Design Decisions
//! - Headers are parsed once, when the factory is built
//! - Request ID is a UUID v4, set before any caller header so callers can override it

use http::header::{HeaderName, HeaderValue, USER_AGENT};
use http::HeaderMap;
use uuid::Uuid;

use super::cookie::CookieEncoder;
use super::method::{HttpMethod, RequestMethod};
use super::model::Request;
use super::parameters::QueryOptions;
use super::uri::RequestUri;
use crate::config::ClientConfig;
use crate::error::{RequestError, RequestResult};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Creates requests pre-populated from a [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct RequestFactory {
    headers: HeaderMap,
    request_id: bool,
    cookie_encoder: CookieEncoder,
    query_options: QueryOptions,
}

impl RequestFactory {
    /// Build a factory from configuration.
    ///
    /// Fails with `InvalidHeader` if a configured header does not parse; a
    /// validated configuration never does.
    pub fn new(config: &ClientConfig) -> RequestResult<Self> {
        let mut headers = HeaderMap::new();
        for entry in &config.request.default_headers {
            let name = HeaderName::from_bytes(entry.name.as_bytes())?;
            let value = HeaderValue::from_str(&entry.value)?;
            headers.append(name, value);
        }
        if let Some(agent) = &config.request.user_agent {
            headers.insert(USER_AGENT, HeaderValue::from_str(agent)?);
        }

        Ok(Self {
            headers,
            request_id: config.request.request_id,
            cookie_encoder: config.cookies.encoder,
            query_options: QueryOptions::from(&config.query),
        })
    }

    /// Create a request with a standard verb.
    pub fn request<U>(&self, method: HttpMethod, uri: U) -> RequestResult<Request>
    where
        U: TryInto<RequestUri, Error = RequestError>,
    {
        self.build(RequestMethod::standard(method)?, uri.try_into()?)
    }

    /// Create a request with a raw method token.
    pub fn custom<U>(&self, method_name: &str, uri: U) -> RequestResult<Request>
    where
        U: TryInto<RequestUri, Error = RequestError>,
    {
        self.build(RequestMethod::from_name(method_name)?, uri.try_into()?)
    }

    fn build(&self, method: RequestMethod, uri: RequestUri) -> RequestResult<Request> {
        let mut request = Request::from_parts(method, uri);
        request
            .set_cookie_encoder(self.cookie_encoder)
            .set_query_options(self.query_options);

        let headers = request.headers_mut();
        headers.extend(self.headers.clone());
        if self.request_id {
            let id = Uuid::new_v4().to_string();
            headers.insert(X_REQUEST_ID, HeaderValue::from_str(&id)?);
        }

        tracing::trace!(request = %request, "Created request");
        Ok(request)
    }
}

impl Default for RequestFactory {
    fn default() -> Self {
        Self {
            headers: HeaderMap::new(),
            request_id: false,
            cookie_encoder: CookieEncoder::default(),
            query_options: QueryOptions::default(),
        }
    }
}
