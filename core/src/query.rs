/*
 * query.rs
 * Copyright (C) 2026 The Scurry contributors
 *
 * This file is part of Scurry, an asynchronous HTTP client.
 *
 * Scurry is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Scurry is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Scurry.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Query strings and URL-encoded form bodies from structured parameters.

use std::fmt;

use indexmap::IndexMap;
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::charset::Charset;
use crate::error::Result;

/// Bytes left as-is when quoting a `key=value` pair: unreserved characters
/// plus `/ = + ? &`.
const QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b'=')
    .remove(b'+')
    .remove(b'?')
    .remove(b'&');

/// One parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// One `key=element` pair per element.
    List(Vec<ParamValue>),
    /// Flattened to one `key=subkey` pair per subkey; the submap's values are not sent.
    Map(IndexMap<String, ParamValue>),
}

impl ParamValue {
    /// Empty text, zero, false and empty collections are never encoded.
    pub fn is_falsy(&self) -> bool {
        match self {
            ParamValue::Text(s) => s.is_empty(),
            ParamValue::Int(i) => *i == 0,
            ParamValue::Float(f) => *f == 0.0,
            ParamValue::Bool(b) => !b,
            ParamValue::List(l) => l.is_empty(),
            ParamValue::Map(m) => m.is_empty(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            ParamValue::Map(m) => {
                for (i, key) in m.keys().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(key)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i.into())
    }
}

impl From<u32> for ParamValue {
    fn from(i: u32) -> Self {
        ParamValue::Int(i.into())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(items: Vec<T>) -> Self {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, ParamValue>> for ParamValue {
    fn from(m: IndexMap<String, ParamValue>) -> Self {
        ParamValue::Map(m)
    }
}

/// Query parameters: a mapping, or a pre-formed query fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Fields(IndexMap<String, ParamValue>),
    /// Not mapping-like: quoted and appended after `?` as given.
    Raw(String),
}

impl Params {
    pub fn is_empty(&self) -> bool {
        match self {
            Params::Fields(m) => m.is_empty(),
            Params::Raw(s) => s.is_empty(),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params::Fields(fields(iter))
    }
}

impl From<IndexMap<String, ParamValue>> for Params {
    fn from(m: IndexMap<String, ParamValue>) -> Self {
        Params::Fields(m)
    }
}

impl From<&str> for Params {
    fn from(s: &str) -> Self {
        Params::Raw(s.to_string())
    }
}

impl From<String> for Params {
    fn from(s: String) -> Self {
        Params::Raw(s)
    }
}

/// Build an ordered field mapping from `(key, value)` pairs.
pub fn fields<K, V, I>(iter: I) -> IndexMap<String, ParamValue>
where
    K: Into<String>,
    V: Into<ParamValue>,
    I: IntoIterator<Item = (K, V)>,
{
    iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// What goes in front of the encoded pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// `?a=1&b=2`: the URI has no query yet.
    Fresh,
    /// `&a=1&b=2`: appended to an existing query.
    Append,
    /// `a=1&b=2`: URL-encoded form body.
    Bare,
}

/// Encode `params` in iteration order. Returns the empty string when every
/// value is skipped, whatever the mode.
pub fn encode_query(
    params: &IndexMap<String, ParamValue>,
    mode: QueryMode,
    charset: Charset,
) -> Result<String> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        if value.is_falsy() {
            continue;
        }
        match value {
            ParamValue::Map(sub) => {
                for subkey in sub.keys() {
                    pairs.push(quote(&format!("{}={}", key, subkey), charset)?);
                }
            }
            ParamValue::List(items) => {
                for item in items {
                    let text = plus_join(&item.to_string());
                    pairs.push(quote(&format!("{}={}", key, text), charset)?);
                }
            }
            scalar => {
                let text = plus_join(&scalar.to_string());
                pairs.push(quote(&format!("{}={}", key, text), charset)?);
            }
        }
    }
    if pairs.is_empty() {
        return Ok(String::new());
    }
    let joined = pairs.join("&");
    Ok(match mode {
        QueryMode::Fresh => format!("?{}", joined),
        QueryMode::Append => format!("&{}", joined),
        QueryMode::Bare => joined,
    })
}

/// Charset-encode then percent-encode, keeping unreserved bytes and `/=+?&`.
pub fn quote(text: &str, charset: Charset) -> Result<String> {
    let bytes = charset.encode(text)?;
    Ok(percent_encode(&bytes, QUERY_SAFE).to_string())
}

/// Whitespace runs become a single `+`; leading and trailing whitespace is dropped.
fn plus_join(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    fn decode_pairs(q: &str) -> Vec<(String, String)> {
        q.split('&')
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap();
                let k = percent_decode_str(k).decode_utf8_lossy().into_owned();
                let v = percent_decode_str(&v.replace('+', " "))
                    .decode_utf8_lossy()
                    .into_owned();
                (k, v)
            })
            .collect()
    }

    #[test]
    fn space_becomes_plus() {
        let p = fields([("q", "a b")]);
        assert_eq!(encode_query(&p, QueryMode::Bare, Charset::Utf8).unwrap(), "q=a+b");
    }

    #[test]
    fn mode_prefixes() {
        let p = fields([("a", 1i64), ("b", 2i64)]);
        assert_eq!(encode_query(&p, QueryMode::Fresh, Charset::Utf8).unwrap(), "?a=1&b=2");
        assert_eq!(encode_query(&p, QueryMode::Append, Charset::Utf8).unwrap(), "&a=1&b=2");
        assert_eq!(encode_query(&p, QueryMode::Bare, Charset::Utf8).unwrap(), "a=1&b=2");
    }

    #[test]
    fn falsy_values_are_skipped() {
        let mut p = fields([("empty", "")]);
        p.insert("zero".into(), ParamValue::Int(0));
        p.insert("no".into(), false.into());
        p.insert("none".into(), ParamValue::List(vec![]));
        p.insert("keep".into(), "x".into());
        assert_eq!(encode_query(&p, QueryMode::Fresh, Charset::Utf8).unwrap(), "?keep=x");
    }

    #[test]
    fn all_skipped_yields_empty_in_every_mode() {
        let p = fields([("a", "")]);
        for mode in [QueryMode::Fresh, QueryMode::Append, QueryMode::Bare] {
            assert_eq!(encode_query(&p, mode, Charset::Utf8).unwrap(), "");
        }
    }

    #[test]
    fn lists_repeat_the_key() {
        let mut p = IndexMap::new();
        p.insert("tag".to_string(), ParamValue::from(vec!["a b", "c"]));
        assert_eq!(
            encode_query(&p, QueryMode::Bare, Charset::Utf8).unwrap(),
            "tag=a+b&tag=c"
        );
    }

    #[test]
    fn nested_map_sends_subkeys_only() {
        let mut p = IndexMap::new();
        p.insert("f".to_string(), ParamValue::Map(fields([("x", 1i64), ("y", 2i64)])));
        assert_eq!(encode_query(&p, QueryMode::Bare, Charset::Utf8).unwrap(), "f=x&f=y");
    }

    #[test]
    fn reserved_bytes_are_quoted() {
        let p = fields([("path", "a/b#c%d")]);
        assert_eq!(
            encode_query(&p, QueryMode::Bare, Charset::Utf8).unwrap(),
            "path=a/b%23c%25d"
        );
        let p = fields([("name", "café")]);
        assert_eq!(
            encode_query(&p, QueryMode::Bare, Charset::Utf8).unwrap(),
            "name=caf%C3%A9"
        );
        assert_eq!(
            encode_query(&p, QueryMode::Bare, Charset::Latin1).unwrap(),
            "name=caf%E9"
        );
    }

    #[test]
    fn round_trip_preserves_order() {
        let p = fields([
            ("zeta", "last letter"),
            ("alpha", "first"),
            ("mid", "x y z"),
            ("uni", "naïve"),
        ]);
        let q = encode_query(&p, QueryMode::Bare, Charset::Utf8).unwrap();
        let decoded = decode_pairs(&q);
        let expected: Vec<(String, String)> =
            p.iter().map(|(k, v)| (k.clone(), v.to_string())).collect();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn unencodable_text_is_an_error() {
        let p = fields([("a", "€")]);
        assert!(encode_query(&p, QueryMode::Bare, Charset::Latin1).is_err());
    }
}
