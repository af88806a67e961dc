//! Request serialization.
//!
//! # Responsibilities
//! - Snapshot a [`Request`] into a wire object for the transport
//! - Choose the wire shape from the body kind
//! - Normalize the request target
//!
//! # Design Decisions
//! - Serialization reads the model and never mutates it
//! - Every wire object owns a copy of the headers taken at call time
//! - An in-memory body that is not raw bytes is sent as headers with an empty
//!   payload; encoding it is the caller's job
//! - A chunk sequence is handed over by handle, never polled here

use bytes::Bytes;

use super::message::{FullRequest, RequestHead, StreamedRequest, WireRequest};
use super::path::request_target;
use crate::error::{RequestError, RequestResult};
use crate::observability::metrics::{self, WireShape};
use crate::request::{Body, BodyValue, Request};

/// Conversions from the request model to wire objects.
pub trait ToWire {
    /// Buffered form: head plus complete payload.
    fn to_full_request(&self) -> RequestResult<FullRequest>;

    /// Streamed form: head plus the body's chunk sequence.
    fn to_streamed_request(&self) -> RequestResult<StreamedRequest>;

    /// Pick the streamed or buffered form from the body kind.
    #[deprecated(note = "call to_full_request or to_streamed_request for the shape you need")]
    fn to_wire_request(&self) -> RequestResult<WireRequest>;

    /// Request line and headers only.
    fn to_request_head(&self) -> RequestHead;
}

impl ToWire for Request {
    fn to_full_request(&self) -> RequestResult<FullRequest> {
        full_request(self)
    }

    fn to_streamed_request(&self) -> RequestResult<StreamedRequest> {
        streamed_request(self)
    }

    fn to_wire_request(&self) -> RequestResult<WireRequest> {
        wire_request(self)
    }

    fn to_request_head(&self) -> RequestHead {
        request_head(self)
    }
}

/// Build the buffered wire form.
///
/// Fails with `InvalidState` when the body is a chunk sequence.
pub fn full_request(request: &Request) -> RequestResult<FullRequest> {
    let payload = match request.body() {
        Body::Empty => Bytes::new(),
        Body::Full(BodyValue::Bytes(bytes)) => bytes.clone(),
        Body::Full(BodyValue::Value(value)) => {
            tracing::debug!(
                body_type = value.type_name(),
                "Body is not raw bytes, sending headers with empty payload"
            );
            Bytes::new()
        }
        Body::Streaming(_) => {
            return Err(RequestError::InvalidState(
                "body is a chunk sequence, build a streamed request",
            ))
        }
    };

    let head = snapshot_head(request);
    tracing::debug!(
        request_line = %head.request_line(),
        payload_len = payload.len(),
        "Built full wire request"
    );
    metrics::record_wire_request(WireShape::Full);
    Ok(FullRequest::new(head, payload))
}

/// Build the streamed wire form.
///
/// Fails with `InvalidState` unless the body is a chunk sequence.
pub fn streamed_request(request: &Request) -> RequestResult<StreamedRequest> {
    let Body::Streaming(chunks) = request.body() else {
        return Err(RequestError::InvalidState("no publisher body set"));
    };

    let head = snapshot_head(request);
    tracing::debug!(request_line = %head.request_line(), "Built streamed wire request");
    metrics::record_wire_request(WireShape::Streamed);
    Ok(StreamedRequest::new(head, chunks.clone()))
}

/// Build whichever form matches the body kind.
pub fn wire_request(request: &Request) -> RequestResult<WireRequest> {
    if request.is_streaming() {
        streamed_request(request).map(WireRequest::Streamed)
    } else {
        full_request(request).map(WireRequest::Full)
    }
}

/// Build the request line and headers, ignoring the body.
pub fn request_head(request: &Request) -> RequestHead {
    let head = snapshot_head(request);
    tracing::debug!(request_line = %head.request_line(), "Built request head");
    metrics::record_wire_request(WireShape::Head);
    head
}

fn snapshot_head(request: &Request) -> RequestHead {
    RequestHead::new(
        request.request_method().wire().clone(),
        request_target(request.uri()),
        request.headers().clone(),
    )
}
