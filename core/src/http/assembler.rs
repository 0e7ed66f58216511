/*
 * assembler.rs
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

//! Turn a `RequestSpec` into HTTP/1.1 wire bytes.

use bytes::{BufMut, Bytes, BytesMut};
use indexmap::IndexMap;
use log::debug;

use crate::charset::Charset;
use crate::error::Result;
use crate::http::body::build_body;
use crate::http::cookie::{cookie_header, CookieStore};
use crate::http::headers::Headers;
use crate::http::request::RequestSpec;
use crate::query::{encode_query, quote, Params, QueryMode};
use crate::uri::TargetUri;

/// A request ready for the wire.
#[derive(Debug, Clone)]
pub struct AssembledRequest {
    pub target: TargetUri,
    /// `METHOD path HTTP/1.1`
    pub request_line: String,
    pub headers: Headers,
    pub body: Bytes,
}

impl AssembledRequest {
    /// Request line and headers, CRLF-joined and terminated by a blank line,
    /// followed by the raw body bytes.
    pub fn to_bytes(&self, charset: Charset) -> Result<Bytes> {
        let mut head = String::with_capacity(256);
        head.push_str(&self.request_line);
        head.push_str("\r\n");
        for (k, v) in self.headers.iter() {
            head.push_str(k);
            head.push_str(": ");
            head.push_str(v);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");
        let head = charset.encode(&head)?;
        let mut out = BytesMut::with_capacity(head.len() + self.body.len());
        out.put_slice(&head);
        out.put_slice(&self.body);
        Ok(out.freeze())
    }
}

/// Request path: `/` when empty, then the URI's own query, then `params`.
pub fn build_path(target: &TargetUri, params: Option<&Params>, charset: Charset) -> Result<String> {
    let mut path = if target.path.is_empty() {
        "/".to_string()
    } else {
        target.path.clone()
    };
    if !target.query.is_empty() {
        path.push('?');
        path.push_str(&target.query);
    }
    match params {
        Some(Params::Fields(fields)) => {
            let mode = if target.query.is_empty() {
                QueryMode::Fresh
            } else {
                QueryMode::Append
            };
            path.push_str(&encode_query(fields, mode, charset)?);
        }
        Some(Params::Raw(raw)) if !raw.is_empty() => {
            debug!("params are not a mapping; appending {:?} as a query fragment", raw);
            path.push('?');
            path.push_str(&quote(raw, charset)?);
        }
        _ => {}
    }
    Ok(path)
}

/// Build the full request for `spec`, consulting `cookie_store` for cookies
/// that apply to the target host and path.
pub async fn assemble(
    spec: &RequestSpec,
    cookie_store: Option<&dyn CookieStore>,
) -> Result<AssembledRequest> {
    let target = TargetUri::parse(&spec.uri, spec.port)?;

    let mut headers = Headers::new();
    headers.insert("Host", target.host_header());
    headers.insert("Connection", "keep-alive");
    headers.insert("Accept-Encoding", "gzip, deflate");
    headers.insert("Accept", "*/*");
    headers.insert("Content-Length", "0");
    headers.insert("User-Agent", spec.user_agent.as_str());

    let mut cookies: IndexMap<String, String> = match cookie_store {
        Some(store) => store.additional_cookies(&target.host, target.cookie_path()),
        None => IndexMap::new(),
    };
    for (k, v) in &spec.cookies {
        cookies.insert(k.clone(), v.clone());
    }

    let path = build_path(&target, spec.params.as_ref(), spec.encoding)?;
    let request_line = format!("{} {} HTTP/1.1", spec.method.as_str(), path);

    let mut body = Bytes::new();
    if spec.has_body_source() {
        let encoded = build_body(spec).await?;
        if let Some(ct) = encoded.content_type {
            headers.insert("Content-Type", ct);
        }
        headers.insert("Content-Length", encoded.content_length.to_string());
        body = encoded.body;
    }

    headers.extend_replacing(&spec.headers);

    if let Some(value) = cookie_header(&cookies) {
        headers.append("Cookie", value);
    }

    Ok(AssembledRequest {
        target,
        request_line,
        headers,
        body,
    })
}
