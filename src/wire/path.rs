//! Request-target normalization.
//!
//! Once a connection is scoped to a host, the request line carries an
//! origin-relative target. Absolute URIs lose their scheme and authority;
//! path, query and fragment are kept verbatim.

use crate::observability::metrics;
use crate::request::RequestUri;

/// The request target for `uri`.
///
/// Relative URIs are used unchanged. Absolute URIs that cannot be reduced to an
/// origin-relative form fall back to the full URI string.
pub fn request_target(uri: &RequestUri) -> String {
    if !uri.is_absolute() {
        return uri.as_str().to_string();
    }

    match origin_form(uri) {
        Some(target) => target,
        None => {
            tracing::warn!(uri = %uri, "Cannot strip scheme and authority, sending URI unmodified");
            metrics::record_path_fallback();
            uri.as_str().to_string()
        }
    }
}

fn origin_form(uri: &RequestUri) -> Option<String> {
    if uri.is_opaque() {
        return None;
    }

    let path = uri.path();
    // without its authority, "//x" would read back as one
    if path.starts_with("//") {
        return None;
    }

    let mut target = String::with_capacity(uri.as_str().len());
    if path.is_empty() {
        target.push('/');
    } else {
        target.push_str(path);
    }
    if let Some(query) = uri.query() {
        target.push('?');
        target.push_str(query);
    }
    if let Some(fragment) = uri.fragment() {
        target.push('#');
        target.push_str(fragment);
    }
    Some(target)
}
