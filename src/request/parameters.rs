//! Decoded query parameters.
//!
//! # Responsibilities
//! - Decode a raw query string into an ordered name → values multimap
//! - Re-encode a multimap into a form-style query string
//! - Rewrite parameters through the owning request's URI
//!
//! # Design Decisions
//! - A decoded `Parameters` value is immutable once shared; writes go through
//!   [`ParametersMut`], which replaces the request URI
//! - Names keep the position of their first occurrence
//! - `+` decodes to a space; percent-escapes decode as UTF-8 (lossy)

use std::borrow::Cow;
use std::str::FromStr;
use std::sync::Arc;

use url::form_urlencoded;

use super::model::Request;
use crate::error::RequestResult;

/// Query decoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Pairs beyond this count are dropped.
    pub max_params: usize,
    /// Treat `;` like `&`.
    pub semicolon_is_separator: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_params: 1024,
            semicolon_is_separator: true,
        }
    }
}

/// Query parameters decoded from a request URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, Vec<String>)>,
}

impl Parameters {
    /// Decode a raw query string (without the leading `?`).
    pub fn decode(query: Option<&str>, options: &QueryOptions) -> Self {
        let mut params = Parameters::default();
        let Some(query) = query else {
            return params;
        };

        let query: Cow<'_, str> = if options.semicolon_is_separator && query.contains(';') {
            Cow::Owned(query.replace(';', "&"))
        } else {
            Cow::Borrowed(query)
        };

        let mut count = 0;
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            if name.is_empty() {
                continue;
            }
            if count == options.max_params {
                break;
            }
            params.push(&name, value.into_owned());
            count += 1;
        }
        params
    }

    fn push(&mut self, name: &str, value: String) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name.to_string(), vec![value])),
        }
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// All values for `name`, empty if absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// First value for `name` parsed as `T`.
    pub fn get_as<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the values of `name`. An existing name keeps its position, a new
    /// name is appended, and an empty list removes the name.
    pub fn replace(&mut self, name: &str, values: Vec<String>) {
        let existing = self.entries.iter().position(|(n, _)| n == name);
        match (existing, values.is_empty()) {
            (Some(i), true) => {
                self.entries.remove(i);
            }
            (Some(i), false) => self.entries[i].1 = values,
            (None, true) => {}
            (None, false) => self.entries.push((name.to_string(), values)),
        }
    }

    /// Encode as a form-style query string (`a=1&b=x+y`).
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, values) in &self.entries {
            for value in values {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }
}

/// Write access to a request's query parameters.
///
/// Every write rebuilds the query string and replaces the request URI, so
/// the next [`Request::parameters`] call decodes the new state.
#[derive(Debug)]
pub struct ParametersMut<'a> {
    request: &'a mut Request,
}

impl<'a> ParametersMut<'a> {
    pub(crate) fn new(request: &'a mut Request) -> Self {
        Self { request }
    }

    /// The parameters as currently encoded in the URI.
    pub fn current(&self) -> Arc<Parameters> {
        self.request.parameters()
    }

    /// Replace all values of `name`.
    pub fn set<I, V>(&mut self, name: &str, values: I) -> RequestResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.rewrite(name, values)?;
        Ok(self)
    }

    /// Append one value to `name`.
    pub fn add(&mut self, name: &str, value: impl Into<String>) -> RequestResult<&mut Self> {
        let mut values: Vec<String> = self
            .raw_pairs()
            .into_iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v)
            .collect();
        values.push(value.into());
        self.rewrite(name, values)?;
        Ok(self)
    }

    /// Remove every value of `name`.
    pub fn remove(&mut self, name: &str) -> RequestResult<&mut Self> {
        self.rewrite(name, Vec::new())?;
        Ok(self)
    }

    /// Every pair in the URI query, in order. Unlike [`Parameters::decode`]
    /// this ignores `max_params` and keeps empty names.
    fn raw_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = self.request.uri().query() else {
            return Vec::new();
        };
        let query: Cow<'_, str> = if self.request.query_options().semicolon_is_separator {
            Cow::Owned(query.replace(';', "&"))
        } else {
            Cow::Borrowed(query)
        };
        form_urlencoded::parse(query.as_bytes())
            .map(|(n, v)| (n.into_owned(), v.into_owned()))
            .collect()
    }

    fn rewrite(&mut self, name: &str, values: Vec<String>) -> RequestResult<()> {
        let mut replacement = Some(values);
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (n, v) in self.raw_pairs() {
            if n != name {
                serializer.append_pair(&n, &v);
            } else if let Some(values) = replacement.take() {
                for value in &values {
                    serializer.append_pair(name, value);
                }
            }
        }
        if let Some(values) = replacement {
            for value in &values {
                serializer.append_pair(name, value);
            }
        }

        let query = serializer.finish();
        let uri = self.request.uri().with_query(Some(&query))?;
        tracing::trace!(param = %name, uri = %uri, "Rewrote query parameter");
        self.request.set_uri(uri);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    fn decode(query: &str) -> Parameters {
        Parameters::decode(Some(query), &QueryOptions::default())
    }

    #[test]
    fn test_decode_multimap() {
        let params = decode("a=1&b=x+y&a=2&c&d=%E2%9C%93");
        assert_eq!(params.get_all("a"), ["1", "2"]);
        assert_eq!(params.get("b"), Some("x y"));
        assert_eq!(params.get("c"), Some(""));
        assert_eq!(params.get("d"), Some("\u{2713}"));
        assert_eq!(params.names().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
        assert!(params.get_all("missing").is_empty());
    }

    #[test]
    fn test_decode_absent_query() {
        assert!(Parameters::decode(None, &QueryOptions::default()).is_empty());
    }

    #[test]
    fn test_semicolon_separator() {
        let params = decode("a=1;b=2");
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("2"));

        let options = QueryOptions {
            semicolon_is_separator: false,
            ..QueryOptions::default()
        };
        let params = Parameters::decode(Some("a=1;b=2"), &options);
        assert_eq!(params.get("a"), Some("1;b=2"));
        assert!(!params.contains("b"));
    }

    #[test]
    fn test_max_params() {
        let options = QueryOptions {
            max_params: 2,
            ..QueryOptions::default()
        };
        let params = Parameters::decode(Some("a=1&b=2&c=3"), &options);
        assert_eq!(params.len(), 2);
        assert!(!params.contains("c"));
    }

    #[test]
    fn test_empty_names_skipped() {
        let params = decode("=1&&a=2");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get_as::<u32>("a"), Some(2));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut params = decode("a=1&b=2&c=3");
        params.replace("b", vec!["9".into(), "10".into()]);
        params.replace("d", vec!["4".into()]);
        params.replace("a", Vec::new());
        assert_eq!(params.to_query_string(), "b=9&b=10&c=3&d=4");
    }

    #[test]
    fn test_rewrite_keeps_pairs_beyond_max_params() {
        let mut req = Request::get("/a?a=1&b=2&c=3&d=4").unwrap();
        req.set_query_options(QueryOptions {
            max_params: 2,
            ..QueryOptions::default()
        });
        assert_eq!(req.parameters().len(), 2);

        req.parameters_mut().set("a", ["9"]).unwrap();
        assert_eq!(req.uri().query(), Some("a=9&b=2&c=3&d=4"));

        req.parameters_mut().add("d", "5").unwrap();
        assert_eq!(req.uri().query(), Some("a=9&b=2&c=3&d=4&d=5"));
    }

    #[test]
    fn test_rewrite_keeps_empty_names() {
        let mut req = Request::get("/a?=x&b=2").unwrap();
        req.parameters_mut().set("b", ["3"]).unwrap();
        assert_eq!(req.uri().query(), Some("=x&b=3"));
    }

    #[test]
    fn test_rewrite_replaces_at_first_position() {
        let mut req = Request::get("/a?x=1&y=2&x=3#frag").unwrap();
        req.parameters_mut().set("x", ["7", "8"]).unwrap();
        assert_eq!(req.uri().as_str(), "/a?x=7&x=8&y=2#frag");

        req.parameters_mut().remove("x").unwrap().remove("y").unwrap();
        assert_eq!(req.uri().as_str(), "/a#frag");
    }
}
