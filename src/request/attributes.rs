//! Request-scoped attributes.
//!
//! Out-of-band context for later pipeline stages. Attributes are never
//! written to the wire.

use std::any::Any;
use std::collections::HashMap;

use super::body::AnyValue;

/// Named, type-erased values attached to a request.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    values: HashMap<String, AnyValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), AnyValue::new(value));
    }

    /// Look up `name` as a `T`. A value of another type yields `None`.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|v| v.downcast_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove `name`, returning true if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
