//! Wire serialization subsystem.
//!
//! # Data Flow
//! ```text
//! Request (model)
//!     → serializer.rs (pick shape, snapshot headers)
//!         → path.rs (origin-relative request target)
//!     → message.rs (FullRequest / StreamedRequest / RequestHead)
//!     → transport (encode to HTTP/1.1, or convert into http::Request)
//! ```

pub mod message;
pub mod path;
pub mod serializer;

pub use message::{FullRequest, RequestHead, StreamedRequest, WireRequest};
pub use path::request_target;
pub use serializer::{full_request, request_head, streamed_request, wire_request, ToWire};
