/*
 * body.rs
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

//! Request body encoding and the choice between urlencoded, multipart, JSON
//! and raw bodies.

use bytes::Bytes;
use indexmap::IndexMap;
use log::warn;

use crate::charset::Charset;
use crate::error::Result;
use crate::http::request::{FormData, RequestSpec};
use crate::mime::{default_boundary, encode_multipart, multipart_content_type};
use crate::query::{encode_query, ParamValue, QueryMode};

/// Content type sent for a form that is not mapping-like.
const RAW_FORM_CONTENT_TYPE: &str = "text/html";

/// An encoded request body. `content_length` is always `body.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: Option<String>,
    pub content_length: usize,
    pub body: Bytes,
}

impl EncodedBody {
    pub fn new(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self {
            content_type: Some(content_type.into()),
            content_length: body.len(),
            body,
        }
    }

    pub fn empty() -> Self {
        Self {
            content_type: None,
            content_length: 0,
            body: Bytes::new(),
        }
    }
}

/// Compact JSON document, `application/json`.
pub fn encode_json(value: &serde_json::Value) -> Result<EncodedBody> {
    let body = serde_json::to_vec(value)?;
    Ok(EncodedBody::new(mime::APPLICATION_JSON.to_string(), body))
}

/// URL-encoded form fields, `application/x-www-form-urlencoded`.
pub fn encode_form(fields: &IndexMap<String, ParamValue>, charset: Charset) -> Result<EncodedBody> {
    let body = encode_query(fields, QueryMode::Bare, charset)?;
    Ok(EncodedBody::new(
        mime::APPLICATION_WWW_FORM_URLENCODED.to_string(),
        body.into_bytes(),
    ))
}

/// Pick and run the body encoding for `spec`:
/// files + form → one multipart body; files → multipart; form → urlencoded
/// (or raw `text/html` when not mapping-like); JSON → JSON; otherwise empty.
/// Empty sources and a null JSON value count as absent.
pub async fn build_body(spec: &RequestSpec) -> Result<EncodedBody> {
    let files = spec.files.as_ref().filter(|f| !f.is_empty());
    let data = spec.data.as_ref().filter(|d| !d.is_empty());
    let json = spec.json_payload();

    match (files, data) {
        (Some(files), Some(data)) => {
            let merged = merge_parts(files, data);
            multipart_body(&merged, spec.encoding).await
        }
        (Some(files), None) => multipart_body(files, spec.encoding).await,
        (None, Some(FormData::Fields(fields))) => encode_form(fields, spec.encoding),
        (None, Some(FormData::Raw(raw))) => {
            Ok(EncodedBody::new(RAW_FORM_CONTENT_TYPE, raw.clone()))
        }
        (None, None) => match json {
            Some(value) => encode_json(value),
            None => Ok(EncodedBody::empty()),
        },
    }
}

async fn multipart_body(parts: &IndexMap<String, String>, charset: Charset) -> Result<EncodedBody> {
    let boundary = default_boundary();
    let body = encode_multipart(parts, boundary, charset).await?;
    Ok(EncodedBody::new(multipart_content_type(boundary), body))
}

/// Files first; form fields then override same-named parts in place.
fn merge_parts(files: &IndexMap<String, String>, data: &FormData) -> IndexMap<String, String> {
    let mut merged = files.clone();
    match data {
        FormData::Fields(fields) => {
            for (name, value) in fields {
                merged.insert(name.clone(), value.to_string());
            }
        }
        FormData::Raw(_) => {
            warn!("raw form data cannot be merged into a multipart body; sending files only");
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::Method;
    use crate::query::fields;

    #[tokio::test]
    async fn form_is_urlencoded() {
        let mut spec = RequestSpec::new(Method::Post, "http://h/");
        spec.data(fields([("q", "a b")]));
        let body = build_body(&spec).await.unwrap();
        assert_eq!(body.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
        assert_eq!(&body.body[..], b"q=a+b");
        assert_eq!(body.content_length, 5);
    }

    #[tokio::test]
    async fn raw_form_is_text_html() {
        let mut spec = RequestSpec::new(Method::Post, "http://h/");
        spec.data("<p>hi</p>");
        let body = build_body(&spec).await.unwrap();
        assert_eq!(body.content_type.as_deref(), Some("text/html"));
        assert_eq!(&body.body[..], b"<p>hi</p>");
    }

    #[tokio::test]
    async fn json_is_compact() {
        let mut spec = RequestSpec::new(Method::Post, "http://h/");
        spec.json(&serde_json::json!({"a": [1, 2], "b": "c"})).unwrap();
        let body = build_body(&spec).await.unwrap();
        assert_eq!(body.content_type.as_deref(), Some("application/json"));
        assert_eq!(&body.body[..], br#"{"a":[1,2],"b":"c"}"#);
    }

    #[tokio::test]
    async fn form_wins_over_json() {
        let mut spec = RequestSpec::new(Method::Post, "http://h/");
        spec.data(fields([("k", "v")]));
        spec.json(&serde_json::json!({"ignored": true})).unwrap();
        let body = build_body(&spec).await.unwrap();
        assert_eq!(&body.body[..], b"k=v");
    }

    #[tokio::test]
    async fn files_and_form_merge_into_multipart() {
        let mut spec = RequestSpec::new(Method::Post, "http://h/");
        spec.file("a", "file-or-text").file("b", "x");
        spec.data(fields([("b", "override"), ("c", "new")]));
        let body = build_body(&spec).await.unwrap();
        let ct = body.content_type.clone().unwrap();
        assert!(ct.starts_with("multipart/form-data; boundary="));
        let text = String::from_utf8(body.body.to_vec()).unwrap();
        let a = text.find("name=\"a\"").unwrap();
        let b = text.find("name=\"b\"").unwrap();
        let c = text.find("name=\"c\"").unwrap();
        assert!(a < b && b < c);
        assert!(text.contains("override"));
        assert!(!text.contains("\r\n\r\nx\r\n"));
    }

    #[tokio::test]
    async fn empty_json_object_yields_empty() {
        let mut spec = RequestSpec::new(Method::Post, "http://h/");
        spec.json(&serde_json::json!({})).unwrap();
        assert_eq!(build_body(&spec).await.unwrap(), EncodedBody::empty());
    }

    #[tokio::test]
    async fn nothing_yields_empty() {
        let spec = RequestSpec::new(Method::Get, "http://h/");
        assert_eq!(build_body(&spec).await.unwrap(), EncodedBody::empty());
    }
}
