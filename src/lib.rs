//! Outbound HTTP request model and wire serializer.
//!
//! A caller builds and mutates a [`Request`] (method, URI, headers, cookies,
//! attributes, body), then snapshots it into an immutable wire object for a
//! transport to send: buffered, streamed, or headers only.

pub mod config;
pub mod error;
pub mod observability;
pub mod request;
pub mod wire;

pub use config::schema::ClientConfig;
pub use error::{RequestError, RequestResult};
pub use request::{Body, ChunkStream, HttpMethod, Request, RequestFactory};
pub use wire::{FullRequest, RequestHead, StreamedRequest, ToWire, WireRequest};
