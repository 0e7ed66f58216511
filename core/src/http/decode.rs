/*
 * decode.rs
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

//! `Content-Encoding` decoding of buffered response bodies.

use std::io::Read;

use bytes::Bytes;
use flate2::bufread::{DeflateDecoder, GzDecoder, ZlibDecoder};
use log::debug;

use crate::error::{HttpError, Result};

/// Undo the codings listed in a `Content-Encoding` value, last applied first.
/// `identity` and unknown codings are passed through untouched.
pub fn decode_content(content_encoding: &str, body: Bytes) -> Result<Bytes> {
    let mut body = body;
    for coding in content_encoding.rsplit(',') {
        let coding = coding.trim().to_ascii_lowercase();
        body = match coding.as_str() {
            "gzip" | "x-gzip" => inflate(GzDecoder::new(&body[..]))?,
            "deflate" => inflate_deflate(&body)?,
            "" | "identity" => body,
            other => {
                debug!("leaving body with content-coding {:?} as is", other);
                return Ok(body);
            }
        };
    }
    Ok(body)
}

fn inflate<R: Read>(mut reader: R) -> Result<Bytes> {
    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(HttpError::ContentDecoding)?;
    Ok(Bytes::from(out))
}

/// `deflate` is specified as zlib-wrapped, but raw streams are common.
fn inflate_deflate(body: &[u8]) -> Result<Bytes> {
    match inflate(ZlibDecoder::new(body)) {
        Ok(out) => Ok(out),
        Err(_) => inflate(DeflateDecoder::new(body)),
    }
}
