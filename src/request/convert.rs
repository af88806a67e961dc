//! Body value conversion.

use std::any::{Any, TypeId};
use std::fmt;

use bytes::Bytes;

use super::body::BodyValue;

/// Converts a stored body value into another type.
pub trait ConversionService: fmt::Debug + Send + Sync {
    /// Convert `value` into the type identified by `target`.
    ///
    /// The returned box must hold exactly that type. `None` means no
    /// conversion applies; it is not an error.
    fn convert(&self, value: &BodyValue, target: TypeId) -> Option<Box<dyn Any + Send>>;
}

/// Conversions between bytes, text, and JSON values.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardConversions;

impl ConversionService for StandardConversions {
    fn convert(&self, value: &BodyValue, target: TypeId) -> Option<Box<dyn Any + Send>> {
        let bytes = to_bytes(value)?;

        if target == TypeId::of::<Bytes>() {
            Some(Box::new(bytes))
        } else if target == TypeId::of::<Vec<u8>>() {
            Some(Box::new(bytes.to_vec()))
        } else if target == TypeId::of::<String>() {
            String::from_utf8(bytes.to_vec())
                .ok()
                .map(|s| Box::new(s) as Box<dyn Any + Send>)
        } else if target == TypeId::of::<serde_json::Value>() {
            serde_json::from_slice::<serde_json::Value>(&bytes)
                .ok()
                .map(|v| Box::new(v) as Box<dyn Any + Send>)
        } else {
            None
        }
    }
}

// Every supported source reduces to bytes first.
fn to_bytes(value: &BodyValue) -> Option<Bytes> {
    if let Some(bytes) = value.as_bytes() {
        return Some(bytes.clone());
    }
    if let Some(text) = value.downcast_ref::<String>() {
        return Some(Bytes::from(text.clone()));
    }
    if let Some(text) = value.downcast_ref::<&'static str>() {
        return Some(Bytes::from_static(text.as_bytes()));
    }
    if let Some(raw) = value.downcast_ref::<Vec<u8>>() {
        return Some(Bytes::from(raw.clone()));
    }
    if let Some(json) = value.downcast_ref::<serde_json::Value>() {
        return serde_json::to_vec(json).ok().map(Bytes::from);
    }
    None
}
