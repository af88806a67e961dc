//! Metrics collection.
//!
//! # Metrics
//! - `wire_requests_total` (counter): wire requests produced, by `shape` (full, streamed, head)
//! - `wire_path_fallbacks_total` (counter): request targets that fell back to the unmodified URI
//! - `request_parameter_decodes_total` (counter): query strings decoded
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the library installs no exporter
//! - Without a recorder every call is a no-op

/// Wire request shape label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireShape {
    Full,
    Streamed,
    Head,
}

impl WireShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            WireShape::Full => "full",
            WireShape::Streamed => "streamed",
            WireShape::Head => "head",
        }
    }
}

/// Record a produced wire request.
pub fn record_wire_request(shape: WireShape) {
    ::metrics::counter!("wire_requests_total", "shape" => shape.as_str()).increment(1);
}

/// Record a request target that degraded to the unmodified URI.
pub fn record_path_fallback() {
    ::metrics::counter!("wire_path_fallbacks_total").increment(1);
}

/// Record a query string decode.
pub fn record_parameter_decode() {
    ::metrics::counter!("request_parameter_decodes_total").increment(1);
}
