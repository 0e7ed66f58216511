/*
 * error.rs
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

//! Errors raised by the request/response engine.

use std::io;
use std::time::Duration;

/// Errors from assembling, sending, receiving or redirecting a request.
///
/// Transport failures are carried unchanged in `Io`; recoverable input
/// oddities (bad `host:port`, non-mapping params, unreadable multipart paths)
/// never surface here.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The status line and headers did not arrive before the deadline.
    #[error("response timed out after {0:?}")]
    Timeout(Duration),

    /// A redirect was offered after the redirect budget was spent.
    #[error("too many redirects (max {max})")]
    TooManyRedirects { max: u32 },

    /// Target URI has no usable `scheme://host`.
    #[error("invalid uri: {0}")]
    InvalidUri(String),

    /// Text could not be represented in the configured charset.
    #[error("character {ch:?} cannot be encoded as {charset}")]
    Unencodable { charset: &'static str, ch: char },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed status line, header block or chunk framing.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The peer closed the connection before the response was complete.
    #[error("connection closed")]
    ConnectionClosed,

    /// gzip/deflate body could not be decoded.
    #[error("content decoding failed: {0}")]
    ContentDecoding(io::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl HttpError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// True for the header-read deadline condition.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, HttpError>;
