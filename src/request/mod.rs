//! Request model subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → factory.rs (configured defaults, request ID)
//!     → model.rs (mutate method/URI/headers/cookies/attributes/body)
//!         → cookie.rs (encode, regenerate Cookie header)
//!         → parameters.rs (lazy decode via cache.rs, rewrite via URI)
//!     → wire serializer (reads the model, never writes it)
//! ```
//!
//! # Design Decisions
//! - The model has no dependency on the wire serializer
//! - Body is a sum type: absent, in-memory value, or chunk sequence
//! - Derived state is computed once per URI generation

pub mod attributes;
pub mod body;
pub mod cache;
pub mod convert;
pub mod cookie;
pub mod factory;
pub mod method;
pub mod model;
pub mod parameters;
pub mod uri;

pub use attributes::Attributes;
pub use body::{AnyValue, Body, BodyValue, BoxError, ChunkStream};
pub use convert::{ConversionService, StandardConversions};
pub use cookie::{ClientCookie, Cookie, CookieEncoder, EncodableCookie};
pub use factory::{RequestFactory, X_REQUEST_ID};
pub use method::{HttpMethod, RequestMethod};
pub use model::Request;
pub use parameters::{Parameters, ParametersMut, QueryOptions};
pub use uri::RequestUri;
