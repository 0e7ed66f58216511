/*
 * parser.rs
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

//! HTTP/1.1 response push parser: status line, headers (with obs-fold), body
//! (Content-Length or chunked).
//!
//! Header and status bytes are decoded as ISO-8859-1 so that no input byte is lost.

use bytes::Buf;
use bytes::BytesMut;

use crate::charset::Charset;
use crate::error::{HttpError, Result};

/// Callback for HTTP/1.1 response events. `H1Stream` implements this to collect
/// the head and forward body data to its sink.
pub trait H1ResponseHandler {
    fn status(&mut self, version: &str, code: u16, reason: &str);
    fn header(&mut self, name: &str, value: &str);
    fn body_chunk(&mut self, data: &[u8]);
    fn trailer(&mut self, _name: &str, _value: &str) {}
    fn complete(&mut self);
}

/// How the body following a header block is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Exactly this many bytes.
    Length(u64),
    /// `Transfer-Encoding: chunked`.
    Chunked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Idle,
    StatusLine,
    Headers,
    /// Headers done; caller decides the framing and calls `set_body_mode()`.
    HeadersComplete,
    Body,
    ChunkSize,
    ChunkData,
    ChunkDataEnd,
    ChunkTrailer,
}

/// Push parser for one HTTP/1.1 response at a time. Feed bytes via `receive`;
/// the handler is invoked as complete tokens are parsed.
pub struct ResponseParser {
    state: ParseState,
    content_length: u64,
    bytes_received: u64,
    chunk_remaining: u64,
    /// Last header seen, held back until we know no continuation line follows.
    pending: Option<(String, String)>,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::StatusLine,
            content_length: 0,
            bytes_received: 0,
            chunk_remaining: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Prepare for the next response on the same connection.
    pub fn reset(&mut self) {
        self.state = ParseState::StatusLine;
        self.content_length = 0;
        self.bytes_received = 0;
        self.chunk_remaining = 0;
        self.pending = None;
    }

    fn find_crlf(buf: &[u8]) -> Option<usize> {
        buf.windows(2).position(|w| w == b"\r\n")
    }

    /// Split one line off the front of `buf`, without its CRLF.
    fn take_line(buf: &mut BytesMut) -> Option<String> {
        let line_end = Self::find_crlf(buf)?;
        let line = buf.split_to(line_end + 2);
        Some(Charset::Latin1.decode(&line[..line_end]).into_owned())
    }

    fn flush_pending<H: H1ResponseHandler>(&mut self, handler: &mut H) {
        if let Some((name, value)) = self.pending.take() {
            handler.header(&name, &value);
        }
    }

    fn parse_status_line<H: H1ResponseHandler>(line: &str, handler: &mut H) -> Result<()> {
        // HTTP/1.1 200 OK, or HTTP/1.1 200
        let mut parts = line.splitn(3, ' ');
        let version = parts.next().unwrap_or("");
        if !version.starts_with("HTTP/") {
            return Err(HttpError::protocol(format!("bad status line: {:?}", line)));
        }
        let code = parts
            .next()
            .filter(|s| s.len() == 3)
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(|| HttpError::protocol(format!("bad status code: {:?}", line)))?;
        let reason = parts.next().unwrap_or("").trim();
        handler.status(version, code, reason);
        Ok(())
    }

    /// Consume and parse as much as possible from `buf`. Partial tokens stay in `buf`.
    /// Returns at `HeadersComplete` so the caller can pick the body framing.
    pub fn receive<H: H1ResponseHandler>(&mut self, buf: &mut BytesMut, handler: &mut H) -> Result<()> {
        while !buf.is_empty() {
            match self.state {
                ParseState::StatusLine => {
                    let line = match Self::take_line(buf) {
                        Some(l) => l,
                        None => return Ok(()),
                    };
                    Self::parse_status_line(&line, handler)?;
                    self.state = ParseState::Headers;
                }
                ParseState::Headers => {
                    let line = match Self::take_line(buf) {
                        Some(l) => l,
                        None => return Ok(()),
                    };
                    if line.is_empty() {
                        self.flush_pending(handler);
                        self.state = ParseState::HeadersComplete;
                        return Ok(());
                    }
                    if line.starts_with(' ') || line.starts_with('\t') {
                        // obs-fold
                        if let Some((_, value)) = self.pending.as_mut() {
                            let more = line.trim();
                            if !more.is_empty() {
                                if !value.is_empty() {
                                    value.push(' ');
                                }
                                value.push_str(more);
                            }
                        }
                        continue;
                    }
                    self.flush_pending(handler);
                    if let Some((name, value)) = line.split_once(':') {
                        self.pending = Some((name.trim().to_string(), value.trim().to_string()));
                    }
                }
                ParseState::HeadersComplete => return Ok(()),
                ParseState::Body => {
                    let remaining = self.content_length - self.bytes_received;
                    let to_read = remaining.min(buf.len() as u64) as usize;
                    if to_read > 0 {
                        let chunk = buf.split_to(to_read);
                        handler.body_chunk(&chunk);
                        self.bytes_received += to_read as u64;
                    }
                    if self.bytes_received >= self.content_length {
                        handler.complete();
                        self.state = ParseState::Idle;
                    }
                }
                ParseState::ChunkSize => {
                    let line = match Self::take_line(buf) {
                        Some(l) => l,
                        None => return Ok(()),
                    };
                    let hex_part = line.split(';').next().unwrap_or("").trim();
                    self.chunk_remaining = u64::from_str_radix(hex_part, 16)
                        .map_err(|_| HttpError::protocol(format!("bad chunk size: {:?}", line)))?;
                    self.state = if self.chunk_remaining == 0 {
                        ParseState::ChunkTrailer
                    } else {
                        ParseState::ChunkData
                    };
                }
                ParseState::ChunkData => {
                    let to_read = self.chunk_remaining.min(buf.len() as u64) as usize;
                    let chunk = buf.split_to(to_read);
                    handler.body_chunk(&chunk);
                    self.chunk_remaining -= to_read as u64;
                    if self.chunk_remaining == 0 {
                        self.state = ParseState::ChunkDataEnd;
                    }
                }
                ParseState::ChunkDataEnd => {
                    if buf.len() < 2 {
                        return Ok(());
                    }
                    if &buf[..2] != b"\r\n" {
                        return Err(HttpError::protocol("chunk data not followed by CRLF"));
                    }
                    buf.advance(2);
                    self.state = ParseState::ChunkSize;
                }
                ParseState::ChunkTrailer => {
                    let line = match Self::take_line(buf) {
                        Some(l) => l,
                        None => return Ok(()),
                    };
                    if line.is_empty() {
                        handler.complete();
                        self.state = ParseState::Idle;
                    } else if let Some((name, value)) = line.split_once(':') {
                        handler.trailer(name.trim(), value.trim());
                    }
                }
                ParseState::Idle => return Ok(()),
            }
        }
        Ok(())
    }

    /// Called after headers are received (state `HeadersComplete`).
    pub fn set_body_mode(&mut self, mode: BodyMode) {
        if self.state != ParseState::HeadersComplete {
            return;
        }
        match mode {
            BodyMode::Chunked => self.state = ParseState::ChunkSize,
            BodyMode::Length(0) => self.state = ParseState::Idle,
            BodyMode::Length(n) => {
                self.content_length = n;
                self.bytes_received = 0;
                self.state = ParseState::Body;
            }
        }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}
