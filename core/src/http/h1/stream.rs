/*
 * stream.rs
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

//! HTTP/1.1 response reader over a borrowed connection.

use std::time::Duration;

use bytes::BytesMut;
use log::{debug, trace};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{HttpError, Result};
use crate::http::connection::Connection;
use crate::http::h1::parser::{BodyMode, H1ResponseHandler, ParseState, ResponseParser};
use crate::http::headers::Headers;

const READ_BUFFER_SIZE: usize = 8192;

/// Status line and header block of one response.
#[derive(Debug, Clone, Default)]
pub struct ResponseHead {
    pub status: u16,
    pub reason: String,
    pub version: String,
    pub headers: Headers,
    /// Raw `Set-Cookie` values, in arrival order.
    pub cookies: Vec<String>,
}

impl H1ResponseHandler for ResponseHead {
    fn status(&mut self, version: &str, code: u16, reason: &str) {
        self.version = version.to_string();
        self.status = code;
        self.reason = reason.to_string();
    }

    fn header(&mut self, name: &str, value: &str) {
        if name.eq_ignore_ascii_case("set-cookie") {
            self.cookies.push(value.to_string());
        }
        self.headers.append(name, value);
    }

    fn body_chunk(&mut self, _data: &[u8]) {}

    fn complete(&mut self) {}
}

/// Forwards body bytes to a caller-supplied sink.
struct BodySink<'s> {
    sink: &'s mut (dyn FnMut(&[u8]) + Send),
}

impl H1ResponseHandler for BodySink<'_> {
    fn status(&mut self, _version: &str, _code: u16, _reason: &str) {}

    fn header(&mut self, _name: &str, _value: &str) {}

    fn body_chunk(&mut self, data: &[u8]) {
        (self.sink)(data);
    }

    fn trailer(&mut self, name: &str, _value: &str) {
        trace!("ignoring trailer {}", name);
    }

    fn complete(&mut self) {}
}

/// Drives a [`ResponseParser`] over a connection. The read buffer lives as
/// long as the stream, so bytes read past one response are kept for the next.
pub struct H1Stream<'a, C> {
    conn: &'a mut C,
    buf: BytesMut,
    parser: ResponseParser,
}

impl<'a, C: Connection> H1Stream<'a, C> {
    pub fn new(conn: &'a mut C) -> Self {
        Self {
            conn,
            buf: BytesMut::with_capacity(READ_BUFFER_SIZE),
            parser: ResponseParser::new(),
        }
    }

    /// Write `data` and flush.
    pub async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.conn.write_all(data).await?;
        self.conn.flush().await?;
        Ok(())
    }

    async fn fill(&mut self) -> Result<()> {
        self.buf.reserve(READ_BUFFER_SIZE);
        let n = self.conn.read_buf(&mut self.buf).await?;
        if n == 0 {
            return Err(HttpError::ConnectionClosed);
        }
        Ok(())
    }

    /// Read the status line and headers of the next final response. Interim
    /// 1xx heads other than 101 are read and dropped. With a `timeout`, the
    /// whole head must arrive before it elapses.
    pub async fn parse_headers(&mut self, timeout: Option<Duration>) -> Result<ResponseHead> {
        self.parser.reset();
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.read_head())
                .await
                .map_err(|_| HttpError::Timeout(limit))?,
            None => self.read_head().await,
        }
    }

    async fn read_head(&mut self) -> Result<ResponseHead> {
        let mut head = ResponseHead::default();
        loop {
            self.parser.receive(&mut self.buf, &mut head)?;
            if self.parser.state() == ParseState::HeadersComplete {
                if (100..200).contains(&head.status) && head.status != 101 {
                    debug!("skipping interim response {} {}", head.status, head.reason);
                    self.parser.reset();
                    head = ResponseHead::default();
                    continue;
                }
                return Ok(head);
            }
            self.fill().await?;
        }
    }

    /// Read the body framed by `mode`, handing each piece to `sink`.
    pub async fn parse_body(
        &mut self,
        mode: BodyMode,
        sink: &mut (dyn FnMut(&[u8]) + Send),
    ) -> Result<()> {
        self.parser.set_body_mode(mode);
        let mut handler = BodySink { sink };
        loop {
            self.parser.receive(&mut self.buf, &mut handler)?;
            if self.parser.state() == ParseState::Idle {
                return Ok(());
            }
            self.fill().await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn head_and_body_across_reads() {
        let (mut client, mut server) = duplex(64);
        let writer = tokio::spawn(async move {
            server.write_all(b"HTTP/1.1 200 OK\r\nSet-Cookie: a=1\r\n").await.unwrap();
            server.write_all(b"Set-Cookie: b=2\r\nContent-Length: 3\r\n\r\nab").await.unwrap();
            server.write_all(b"c").await.unwrap();
            server
        });
        let mut stream = H1Stream::new(&mut client);
        let head = stream.parse_headers(None).await.unwrap();
        assert_eq!(head.status, 200);
        assert_eq!(head.cookies, vec!["a=1", "b=2"]);
        assert_eq!(head.headers.get_all("set-cookie").count(), 2);
        let mut body = Vec::new();
        stream
            .parse_body(BodyMode::Length(3), &mut |d: &[u8]| body.extend_from_slice(d))
            .await
            .unwrap();
        assert_eq!(body, b"abc");
        drop(writer.await.unwrap());
    }

    #[tokio::test]
    async fn eof_mid_body_is_connection_closed() {
        let (mut client, mut server) = duplex(256);
        server
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nshort")
            .await
            .unwrap();
        drop(server);
        let mut stream = H1Stream::new(&mut client);
        stream.parse_headers(None).await.unwrap();
        let err = stream
            .parse_body(BodyMode::Length(10), &mut |_: &[u8]| {})
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::ConnectionClosed));
    }

    #[tokio::test]
    async fn interim_heads_are_skipped() {
        let (mut client, mut server) = duplex(256);
        server
            .write_all(b"HTTP/1.1 100 Continue\r\n\r\n")
            .await
            .unwrap();
        server
            .write_all(b"HTTP/1.1 103 Early Hints\r\nLink: </s.css>\r\n\r\n")
            .await
            .unwrap();
        server
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok")
            .await
            .unwrap();
        let mut stream = H1Stream::new(&mut client);
        let head = stream.parse_headers(None).await.unwrap();
        assert_eq!(head.status, 200);
        assert_eq!(head.headers.get("link"), None);
        let mut body = Vec::new();
        stream
            .parse_body(BodyMode::Length(2), &mut |d: &[u8]| body.extend_from_slice(d))
            .await
            .unwrap();
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn switching_protocols_is_returned() {
        let (mut client, mut server) = duplex(256);
        server
            .write_all(b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\n\r\n")
            .await
            .unwrap();
        let mut stream = H1Stream::new(&mut client);
        let head = stream.parse_headers(None).await.unwrap();
        assert_eq!(head.status, 101);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_peer_times_out() {
        let (mut client, _server) = duplex(64);
        let mut stream = H1Stream::new(&mut client);
        let err = stream
            .parse_headers(Some(Duration::from_millis(50)))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
