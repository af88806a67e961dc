//! Request body representations.
//!
//! A body is absent, a resident in-memory value, or a lazy sequence of
//! binary chunks. Exactly one is active at a time.

use std::any::Any;
use std::fmt;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use futures_util::{Stream, StreamExt};

/// Error type carried by chunk sequences.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The request body.
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    /// A complete in-memory value.
    Full(BodyValue),
    /// Chunks produced on demand and pulled by the transport.
    Streaming(ChunkStream),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, Body::Streaming(_))
    }

    /// The in-memory value, if that is the active representation.
    pub fn value(&self) -> Option<&BodyValue> {
        match self {
            Body::Full(value) => Some(value),
            _ => None,
        }
    }
}

/// A resident body value.
#[derive(Debug, Clone)]
pub enum BodyValue {
    /// Raw payload bytes, sent as-is.
    Bytes(Bytes),
    /// Any other value, encoded upstream before transmission.
    Value(AnyValue),
}

impl BodyValue {
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            BodyValue::Bytes(bytes) => Some(bytes),
            BodyValue::Value(_) => None,
        }
    }

    /// Borrow the value as `T` if that is exactly what is stored.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            BodyValue::Bytes(bytes) => (bytes as &dyn Any).downcast_ref(),
            BodyValue::Value(value) => value.downcast_ref(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            BodyValue::Bytes(_) => std::any::type_name::<Bytes>(),
            BodyValue::Value(value) => value.type_name(),
        }
    }
}

impl From<Bytes> for BodyValue {
    fn from(bytes: Bytes) -> Self {
        BodyValue::Bytes(bytes)
    }
}

/// A shared, type-erased value.
#[derive(Clone)]
pub struct AnyValue {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl AnyValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyValue").field(&self.type_name).finish()
    }
}

/// Handle to a lazy sequence of body chunks.
///
/// Clones share one underlying sequence: every chunk is yielded once, to
/// whichever handle polls for it.
#[derive(Clone)]
pub struct ChunkStream {
    inner: Arc<Mutex<BoxStream<'static, Result<Bytes, BoxError>>>>,
}

impl ChunkStream {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, BoxError>> + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(stream.boxed())),
        }
    }

    /// A finite sequence over already-known chunks.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Bytes>,
        I::IntoIter: Send + 'static,
    {
        Self::new(stream::iter(chunks.into_iter().map(Ok)))
    }

    /// Returns true if both handles pull from the same sequence.
    pub fn same_source(&self, other: &ChunkStream) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Stream for ChunkStream {
    type Item = Result<Bytes, BoxError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkStream").finish_non_exhaustive()
    }
}
