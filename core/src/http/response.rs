/*
 * response.rs
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

//! Response records and their reconstruction from the wire.

use std::borrow::Cow;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::charset::Charset;
use crate::error::Result;
use crate::http::connection::Connection;
use crate::http::cookie::{parse_set_cookie, Cookie};
use crate::http::decode::decode_content;
use crate::http::h1::{BodyMode, H1Stream};
use crate::http::handler::BodyCallback;
use crate::http::headers::Headers;
use crate::http::request::Method;
use crate::uri::TargetUri;

/// Statuses that may carry a `Location` to follow.
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// Response body as stored on the record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    #[default]
    None,
    Bytes(Bytes),
    /// The body went to the named streaming callback.
    Streamed { callback: String },
}

/// One received response.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    pub status_code: u16,
    pub reason: String,
    /// e.g. `HTTP/1.1`
    pub version: String,
    pub headers: Headers,
    pub cookies: Vec<Cookie>,
    pub body: Body,
    /// Charset used by [`ResponseRecord::text`].
    pub encoding: Charset,
    /// Method of the request that produced this response.
    pub method: Method,
    pub url: String,
    /// Responses superseded by redirects, oldest first. Entries have an empty history.
    pub history: Vec<ResponseRecord>,
}

impl ResponseRecord {
    /// Body decoded with `encoding`; empty when there is no buffered body.
    pub fn text(&self) -> Cow<'_, str> {
        self.encoding.decode(self.content())
    }

    /// Raw body bytes; empty when there is no buffered body.
    pub fn content(&self) -> &[u8] {
        match &self.body {
            Body::Bytes(b) => b,
            _ => &[],
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(self.content())?)
    }

    /// First value of header `name`, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    pub fn is_redirect(&self) -> bool {
        REDIRECT_STATUSES.contains(&self.status_code) && self.headers.contains("location")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Switch `encoding` to the `charset` parameter of `Content-Type` when it
    /// names a supported charset; otherwise leave it alone.
    pub fn guess_encoding(&mut self) {
        let Some(value) = self.headers.get("content-type") else {
            return;
        };
        let Ok(content_type) = value.parse::<mime::Mime>() else {
            debug!("unparsable content-type {:?}", value);
            return;
        };
        if let Some(label) = content_type.get_param(mime::CHARSET) {
            match Charset::from_label(label.as_str()) {
                Some(charset) => self.encoding = charset,
                None => warn!("unsupported charset {:?}, keeping {}", label.as_str(), self.encoding),
            }
        }
    }
}

fn has_no_body(method: Method, status: u16) -> bool {
    method == Method::Head || (100..200).contains(&status) || status == 204 || status == 304
}

/// Read one response from `stream`.
///
/// Only the head is subject to `timeout`. A fixed-length body goes to
/// `callback` when one is given; chunked bodies are always buffered.
pub async fn receive<C: Connection>(
    stream: &mut H1Stream<'_, C>,
    method: Method,
    target: &TargetUri,
    timeout: Option<Duration>,
    callback: Option<&mut dyn BodyCallback>,
    encoding: Charset,
) -> Result<ResponseRecord> {
    let head = stream.parse_headers(timeout).await?;
    debug!("{} {} -> {} {}", method, target.to_uri_string(), head.status, head.reason);

    let content_length = match head.headers.get("content-length") {
        Some(v) => match v.trim().parse::<u64>() {
            Ok(n) => Some(n),
            Err(_) => {
                warn!("ignoring invalid content-length {:?}", v);
                None
            }
        },
        None => None,
    };
    let chunked = head
        .headers
        .get_all("transfer-encoding")
        .any(|v| v.to_ascii_lowercase().contains("chunked"));

    let mut body = Body::None;
    if !has_no_body(method, head.status) {
        match content_length {
            Some(n) if n > 0 => match callback {
                Some(cb) => {
                    stream
                        .parse_body(BodyMode::Length(n), &mut |d: &[u8]| cb.on_chunk(d))
                        .await?;
                    cb.on_complete();
                    body = Body::Streamed {
                        callback: cb.name().to_string(),
                    };
                }
                None => body = Body::Bytes(read_buffered(stream, BodyMode::Length(n)).await?),
            },
            Some(_) => {}
            None if chunked => body = Body::Bytes(read_buffered(stream, BodyMode::Chunked).await?),
            None => {}
        }
    }

    if let (Body::Bytes(bytes), Some(coding)) = (&body, head.headers.get("content-encoding")) {
        body = Body::Bytes(decode_content(coding, bytes.clone())?);
    }

    let cookies = head
        .cookies
        .iter()
        .filter_map(|c| parse_set_cookie(c, &target.host))
        .collect();

    let mut record = ResponseRecord {
        status_code: head.status,
        reason: head.reason,
        version: head.version,
        headers: head.headers,
        cookies,
        body,
        encoding,
        method,
        url: target.to_uri_string(),
        history: Vec::new(),
    };
    record.guess_encoding();
    Ok(record)
}

async fn read_buffered<C: Connection>(stream: &mut H1Stream<'_, C>, mode: BodyMode) -> Result<Bytes> {
    let mut buf = BytesMut::new();
    stream
        .parse_body(mode, &mut |d: &[u8]| buf.extend_from_slice(d))
        .await?;
    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpError;
    use crate::http::handler::NamedCallback;
    use std::sync::{Arc, Mutex};
    use tokio::io::{duplex, AsyncWriteExt};

    fn target() -> TargetUri {
        TargetUri::parse("http://example.com/x", None).unwrap()
    }

    async fn receive_from(
        wire: &'static [u8],
        method: Method,
        callback: Option<&mut dyn BodyCallback>,
    ) -> Result<ResponseRecord> {
        let (mut client, mut server) = duplex(4096);
        server.write_all(wire).await.unwrap();
        let mut stream = H1Stream::new(&mut client);
        receive(&mut stream, method, &target(), None, callback, Charset::Utf8).await
    }

    #[tokio::test]
    async fn fixed_length_body() {
        let r = receive_from(
            b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nContent-Type: text/plain; charset=ISO-8859-1\r\n\r\nhello",
            Method::Get,
            None,
        )
        .await
        .unwrap();
        assert_eq!(r.status_code, 200);
        assert_eq!(r.reason, "OK");
        assert_eq!(r.version, "HTTP/1.1");
        assert_eq!(r.content(), b"hello");
        assert_eq!(r.encoding, Charset::Latin1);
        assert_eq!(r.url, "http://example.com/x");
        assert!(r.is_success());
    }

    #[tokio::test]
    async fn chunked_body_excludes_framing() {
        let r = receive_from(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n3\r\nabc\r\n2\r\nde\r\n0\r\n\r\n",
            Method::Get,
            None,
        )
        .await
        .unwrap();
        assert_eq!(r.text(), "abcde");
    }

    #[tokio::test]
    async fn head_and_no_content_have_no_body() {
        let r = receive_from(b"HTTP/1.1 200 OK\r\nContent-Length: 99\r\n\r\n", Method::Head, None)
            .await
            .unwrap();
        assert_eq!(r.body, Body::None);
        let r = receive_from(b"HTTP/1.1 204 No Content\r\n\r\n", Method::Get, None)
            .await
            .unwrap();
        assert_eq!(r.body, Body::None);
        let r = receive_from(b"HTTP/1.1 200 OK\r\n\r\n", Method::Get, None)
            .await
            .unwrap();
        assert_eq!(r.body, Body::None);
        assert_eq!(r.text(), "");
    }

    #[tokio::test]
    async fn callback_receives_fixed_length_body() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut cb = NamedCallback::new("save", move |d: &[u8]| {
            sink.lock().unwrap().extend_from_slice(d)
        });
        let r = receive_from(
            b"HTTP/1.1 200 OK\r\nContent-Length: 4\r\n\r\ndata",
            Method::Get,
            Some(&mut cb),
        )
        .await
        .unwrap();
        assert_eq!(
            r.body,
            Body::Streamed {
                callback: "save".to_string()
            }
        );
        assert!(r.content().is_empty());
        assert_eq!(&seen.lock().unwrap()[..], b"data");
    }

    #[tokio::test]
    async fn cookies_and_repeated_headers() {
        let r = receive_from(
            b"HTTP/1.1 302 Found\r\nLocation: /next\r\nSet-Cookie: a=1; Path=/\r\nSet-Cookie: b=2\r\nContent-Length: 0\r\n\r\n",
            Method::Get,
            None,
        )
        .await
        .unwrap();
        assert!(r.is_redirect());
        assert_eq!(r.cookie("b").map(|c| c.value.as_str()), Some("2"));
        assert_eq!(r.cookie("a").map(|c| c.domain.as_str()), Some("example.com"));
        assert_eq!(r.headers.get_all("Set-Cookie").count(), 2);
    }

    #[tokio::test]
    async fn json_accessor() {
        let r = receive_from(
            b"HTTP/1.1 200 OK\r\nContent-Length: 13\r\nContent-Type: application/json\r\n\r\n{\"ok\": [1,2]}",
            Method::Get,
            None,
        )
        .await
        .unwrap();
        let v: serde_json::Value = r.json().unwrap();
        assert_eq!(v["ok"][1], 2);
        assert_eq!(r.encoding, Charset::Utf8);
    }

    #[tokio::test]
    async fn unknown_charset_keeps_configured() {
        let (mut client, mut server) = duplex(4096);
        server
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=koi8-r\r\nContent-Length: 1\r\n\r\nx")
            .await
            .unwrap();
        let mut stream = H1Stream::new(&mut client);
        let r = receive(&mut stream, Method::Get, &target(), None, None, Charset::Ascii)
            .await
            .unwrap();
        assert_eq!(r.encoding, Charset::Ascii);
    }

    #[tokio::test]
    async fn truncated_body_is_connection_closed() {
        let (mut client, mut server) = duplex(4096);
        server
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabc")
            .await
            .unwrap();
        drop(server);
        let mut stream = H1Stream::new(&mut client);
        let err = receive(&mut stream, Method::Get, &target(), None, None, Charset::Utf8)
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::ConnectionClosed));
    }
}
