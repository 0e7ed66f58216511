/*
 * request.rs
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

//! HTTP request description: method, target, headers, body sources, cookies
//! and per-request options.
//!
//! A `RequestSpec` is built once per logical call. Redirect handling consumes
//! it and produces the next spec; it is not modified in place.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;

use crate::charset::Charset;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::handler::BodyCallback;
use crate::http::headers::Headers;
use crate::query::{ParamValue, Params};

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Other(&'static str),
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Other(s) => s,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form body source.
#[derive(Debug, Clone, PartialEq)]
pub enum FormData {
    /// URL-encoded, or merged into a multipart body when files are present.
    Fields(IndexMap<String, ParamValue>),
    /// Not mapping-like: sent verbatim as `text/html`.
    Raw(Bytes),
}

impl FormData {
    pub fn is_empty(&self) -> bool {
        match self {
            FormData::Fields(m) => m.is_empty(),
            FormData::Raw(b) => b.is_empty(),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FormData::Fields(crate::query::fields(iter))
    }
}

impl From<IndexMap<String, ParamValue>> for FormData {
    fn from(m: IndexMap<String, ParamValue>) -> Self {
        FormData::Fields(m)
    }
}

impl From<&str> for FormData {
    fn from(s: &str) -> Self {
        FormData::Raw(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for FormData {
    fn from(s: String) -> Self {
        FormData::Raw(Bytes::from(s))
    }
}

impl From<Vec<u8>> for FormData {
    fn from(b: Vec<u8>) -> Self {
        FormData::Raw(Bytes::from(b))
    }
}

impl From<Bytes> for FormData {
    fn from(b: Bytes) -> Self {
        FormData::Raw(b)
    }
}

/// Logical description of one HTTP call.
///
/// Fields are public so callers and the redirect step can read them; the
/// chained setters below are the usual way to fill them in.
pub struct RequestSpec {
    pub method: Method,
    pub uri: String,
    /// Used when the URI itself has no port.
    pub port: Option<u16>,
    /// Caller headers; override defaults of the same name.
    pub headers: Headers,
    pub params: Option<Params>,
    pub data: Option<FormData>,
    /// Part name → file path (file part) or text (plain field).
    pub files: Option<IndexMap<String, String>>,
    pub json: Option<serde_json::Value>,
    /// Request-local cookies; win over cookie-store cookies of the same name.
    pub cookies: IndexMap<String, String>,
    pub timeout: Option<Duration>,
    pub max_redirects: Option<u32>,
    pub callback: Option<Box<dyn BodyCallback>>,
    pub encoding: Charset,
    pub user_agent: String,
}

impl RequestSpec {
    /// New request with [`ClientConfig::default`] options.
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self::with_config(method, uri, &ClientConfig::default())
    }

    pub fn with_config(method: Method, uri: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            method,
            uri: uri.into(),
            port: None,
            headers: Headers::new(),
            params: None,
            data: None,
            files: None,
            json: None,
            cookies: IndexMap::new(),
            timeout: config.timeout,
            max_redirects: config.max_redirects,
            callback: None,
            encoding: config.encoding,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Add or replace a header. Comparison is case-insensitive per HTTP.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    pub fn port(&mut self, port: u16) -> &mut Self {
        self.port = Some(port);
        self
    }

    pub fn params(&mut self, params: impl Into<Params>) -> &mut Self {
        self.params = Some(params.into());
        self
    }

    pub fn data(&mut self, data: impl Into<FormData>) -> &mut Self {
        self.data = Some(data.into());
        self
    }

    /// Add a multipart part: a file path, or text when it names no readable file.
    pub fn file(&mut self, name: impl Into<String>, path_or_text: impl Into<String>) -> &mut Self {
        self.files
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), path_or_text.into());
        self
    }

    /// Serialize `value` as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        self.json = Some(serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn cookie(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_redirects(&mut self, max: Option<u32>) -> &mut Self {
        self.max_redirects = max;
        self
    }

    pub fn callback(&mut self, callback: impl BodyCallback + 'static) -> &mut Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn encoding(&mut self, encoding: Charset) -> &mut Self {
        self.encoding = encoding;
        self
    }

    /// The JSON payload, unless it is empty: null, `false`, zero, `""`,
    /// `[]` and `{}` send no body.
    pub fn json_payload(&self) -> Option<&serde_json::Value> {
        self.json.as_ref().filter(|j| json_is_truthy(j))
    }

    /// True when form data, files or a non-empty JSON payload will produce a body.
    pub fn has_body_source(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.is_empty())
            || self.files.as_ref().is_some_and(|f| !f.is_empty())
            || self.json_payload().is_some()
    }
}

fn json_is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl fmt::Debug for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSpec")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("port", &self.port)
            .field("headers", &self.headers)
            .field("params", &self.params)
            .field("data", &self.data)
            .field("files", &self.files)
            .field("json", &self.json)
            .field("cookies", &self.cookies)
            .field("timeout", &self.timeout)
            .field("max_redirects", &self.max_redirects)
            .field("callback", &self.callback.as_ref().map(|c| c.name().to_string()))
            .field("encoding", &self.encoding)
            .finish()
    }
}
