//! Wire request objects.
//!
//! Immutable snapshots handed to the transport: a request line plus headers,
//! optionally followed by a complete payload or a handle to a chunk sequence.

use bytes::{BufMut, Bytes, BytesMut};
use http::{HeaderMap, Method, Version};

use crate::error::RequestResult;
use crate::request::ChunkStream;

/// Request line and headers.
#[derive(Debug, Clone)]
pub struct RequestHead {
    method: Method,
    target: String,
    version: Version,
    headers: HeaderMap,
}

impl RequestHead {
    pub(crate) fn new(method: Method, target: String, headers: HeaderMap) -> Self {
        Self {
            method,
            target,
            version: Version::HTTP_11,
            headers,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Target as written on the request line; an empty target is sent as `/`.
    pub fn target(&self) -> &str {
        if self.target.is_empty() {
            "/"
        } else {
            &self.target
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// `METHOD target HTTP/1.1`
    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.target(), version_str(self.version))
    }

    /// Append the HTTP/1.1 head (request line, headers, blank line) to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_slice(self.request_line().as_bytes());
        dst.put_slice(b"\r\n");
        for (name, value) in &self.headers {
            dst.put_slice(name.as_str().as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::new();
        self.encode(&mut dst);
        dst.freeze()
    }

    fn into_http<B>(self, body: B) -> RequestResult<http::Request<B>> {
        let uri: http::Uri = self.target().parse().map_err(http::Error::from)?;
        let mut request = http::Request::new(body);
        *request.method_mut() = self.method;
        *request.uri_mut() = uri;
        *request.version_mut() = self.version;
        *request.headers_mut() = self.headers;
        Ok(request)
    }
}

/// A request whose complete payload is resident.
#[derive(Debug, Clone)]
pub struct FullRequest {
    head: RequestHead,
    payload: Bytes,
}

impl FullRequest {
    pub(crate) fn new(head: RequestHead, payload: Bytes) -> Self {
        Self { head, payload }
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    pub fn headers(&self) -> &HeaderMap {
        self.head.headers()
    }

    /// Payload bytes; empty for a request without a body.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Append head and payload to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) {
        self.head.encode(dst);
        dst.put_slice(&self.payload);
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::new();
        self.encode(&mut dst);
        dst.freeze()
    }

    /// Convert into an `http::Request` for transports built on the `http` crate.
    pub fn into_http(self) -> RequestResult<http::Request<Bytes>> {
        self.head.into_http(self.payload)
    }
}

/// A request whose payload is pulled chunk by chunk during transmission.
#[derive(Debug, Clone)]
pub struct StreamedRequest {
    head: RequestHead,
    chunks: ChunkStream,
}

impl StreamedRequest {
    pub(crate) fn new(head: RequestHead, chunks: ChunkStream) -> Self {
        Self { head, chunks }
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    pub fn headers(&self) -> &HeaderMap {
        self.head.headers()
    }

    /// Handle to the request's chunk sequence (not yet polled).
    pub fn chunks(&self) -> &ChunkStream {
        &self.chunks
    }

    pub fn into_parts(self) -> (RequestHead, ChunkStream) {
        (self.head, self.chunks)
    }

    /// Convert into an `http::Request` whose body is the chunk sequence.
    pub fn into_http(self) -> RequestResult<http::Request<ChunkStream>> {
        self.head.into_http(self.chunks)
    }
}

/// Either wire shape.
#[derive(Debug, Clone)]
pub enum WireRequest {
    Full(FullRequest),
    Streamed(StreamedRequest),
}

impl WireRequest {
    pub fn head(&self) -> &RequestHead {
        match self {
            WireRequest::Full(full) => full.head(),
            WireRequest::Streamed(streamed) => streamed.head(),
        }
    }

    pub fn is_streamed(&self) -> bool {
        matches!(self, WireRequest::Streamed(_))
    }
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, ACCEPT, HOST};

    fn head(target: &str) -> RequestHead {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("example.com"));
        headers.append(ACCEPT, HeaderValue::from_static("text/plain"));
        headers.append(ACCEPT, HeaderValue::from_static("text/html"));
        RequestHead::new(Method::GET, target.to_string(), headers)
    }

    #[test]
    fn test_request_line() {
        assert_eq!(head("/a?x=1").request_line(), "GET /a?x=1 HTTP/1.1");
        assert_eq!(head("").request_line(), "GET / HTTP/1.1");
    }

    #[test]
    fn test_head_encoding() {
        let bytes = head("/a").to_bytes();
        assert_eq!(
            bytes,
            "GET /a HTTP/1.1\r\nhost: example.com\r\naccept: text/plain\r\naccept: text/html\r\n\r\n"
        );
    }

    #[test]
    fn test_full_encoding_appends_payload() {
        let full = FullRequest::new(head("/upload"), Bytes::from_static(b"data"));
        let bytes = full.to_bytes();
        assert!(bytes.starts_with(b"GET /upload HTTP/1.1\r\n"));
        assert!(bytes.ends_with(b"\r\n\r\ndata"));
    }

    #[test]
    fn test_into_http() {
        let full = FullRequest::new(head("/a?x=1#frag"), Bytes::from_static(b"p"));
        let request = full.into_http().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.uri().path(), "/a");
        assert_eq!(request.uri().query(), Some("x=1"));
        assert_eq!(request.version(), Version::HTTP_11);
        assert_eq!(request.headers().get_all(ACCEPT).iter().count(), 2);
        assert_eq!(request.body(), "p");
    }

    #[test]
    fn test_into_http_rejects_unparseable_target() {
        let full = FullRequest::new(head("a b"), Bytes::new());
        assert!(full.into_http().is_err());
    }
}
