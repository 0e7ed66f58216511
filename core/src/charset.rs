/*
 * charset.rs
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

//! Character sets used to serialize request text and decode response text.

use std::borrow::Cow;
use std::fmt;

use crate::error::{HttpError, Result};

/// Charset applied when text is turned into bytes (query strings, form bodies,
/// multipart text fields) and when response bodies are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    #[default]
    Utf8,
    /// ISO-8859-1: one byte per code point up to U+00FF.
    Latin1,
    Ascii,
}

impl Charset {
    /// Look up a charset by its IANA label (case-insensitive, surrounding quotes ignored).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().trim_matches('"').to_ascii_lowercase();
        match label.as_str() {
            "utf-8" | "utf8" => Some(Charset::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" | "l1" | "cp819" => {
                Some(Charset::Latin1)
            }
            "us-ascii" | "ascii" => Some(Charset::Ascii),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Latin1 => "iso-8859-1",
            Charset::Ascii => "us-ascii",
        }
    }

    /// Strict encode: a character outside the charset is an error.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        let limit = match self {
            Charset::Utf8 => return Ok(Cow::Borrowed(text.as_bytes())),
            Charset::Latin1 => 0xFF,
            Charset::Ascii => 0x7F,
        };
        if text.is_ascii() {
            return Ok(Cow::Borrowed(text.as_bytes()));
        }
        let mut out = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let cp = ch as u32;
            if cp > limit {
                return Err(HttpError::Unencodable {
                    charset: self.name(),
                    ch,
                });
            }
            out.push(cp as u8);
        }
        Ok(Cow::Owned(out))
    }

    /// Lossy decode; invalid sequences become U+FFFD.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            Charset::Utf8 => String::from_utf8_lossy(bytes),
            Charset::Latin1 => {
                if bytes.is_ascii() {
                    String::from_utf8_lossy(bytes)
                } else {
                    Cow::Owned(bytes.iter().map(|&b| b as char).collect())
                }
            }
            Charset::Ascii => {
                if bytes.is_ascii() {
                    String::from_utf8_lossy(bytes)
                } else {
                    Cow::Owned(
                        bytes
                            .iter()
                            .map(|&b| if b.is_ascii() { b as char } else { '\u{FFFD}' })
                            .collect(),
                    )
                }
            }
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(Charset::from_label("UTF-8"), Some(Charset::Utf8));
        assert_eq!(Charset::from_label("\"ISO-8859-1\""), Some(Charset::Latin1));
        assert_eq!(Charset::from_label("koi8-r"), None);
    }

    #[test]
    fn latin1_encode_is_one_byte_per_char() {
        let b = Charset::Latin1.encode("café").unwrap();
        assert_eq!(&b[..], b"caf\xe9");
        assert_eq!(Charset::Latin1.decode(&b), "café");
    }

    #[test]
    fn strict_encode_rejects_unrepresentable() {
        let err = Charset::Ascii.encode("é").unwrap_err();
        assert!(matches!(err, HttpError::Unencodable { ch: 'é', .. }));
        assert!(Charset::Latin1.encode("€").is_err());
    }

    #[test]
    fn ascii_decode_replaces_high_bytes() {
        assert_eq!(Charset::Ascii.decode(b"a\xffb"), "a\u{FFFD}b");
    }
}
