/*
 * multipart.rs
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

//! Build multipart/form-data bodies (RFC 2046 boundary framing).
//!
//! A part whose value names a readable regular file carries that file's bytes
//! with a `filename` parameter and a guessed `Content-Type`; any other value is
//! sent as a plain text field. Files are opened one at a time and closed as
//! soon as their bytes are in the body.

use std::path::Path;
use std::sync::OnceLock;

use bytes::{BufMut, Bytes, BytesMut};
use indexmap::IndexMap;
use log::{debug, trace};
use tokio::fs::{self, File};
use tokio::io::AsyncReadExt;

use crate::charset::Charset;
use crate::error::Result;
use crate::mime::guess::guess_mime_type;
use crate::mime::utils::{is_valid_boundary, quote_param};

const BOUNDARY_PREFIX: &str = "scurry-form-";

static BOUNDARY: OnceLock<String> = OnceLock::new();

/// Process-wide boundary: fixed prefix plus a random suffix chosen once.
pub fn default_boundary() -> &'static str {
    BOUNDARY.get_or_init(|| format!("{}{:016x}", BOUNDARY_PREFIX, rand::random::<u64>()))
}

/// `Content-Type` value for a multipart body with `boundary`.
pub fn multipart_content_type(boundary: &str) -> String {
    format!("{}; boundary={}", mime::MULTIPART_FORM_DATA, boundary)
}

/// Encode `parts` (name → file path or text) as multipart/form-data.
///
/// Emits `parts.len() + 1` delimiters, the last being `--boundary--`.
pub async fn encode_multipart(
    parts: &IndexMap<String, String>,
    boundary: &str,
    charset: Charset,
) -> Result<Bytes> {
    debug_assert!(is_valid_boundary(boundary), "bad boundary {:?}", boundary);
    let mut out = BytesMut::new();
    for (name, value) in parts {
        out.put_slice(b"--");
        out.put_slice(boundary.as_bytes());
        out.put_slice(b"\r\n");

        match open_part_file(value).await {
            Some((mut file, len)) => {
                let path = Path::new(value);
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let header = format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    quote_param(name),
                    quote_param(&filename),
                    guess_mime_type(path),
                );
                out.put_slice(&charset.encode(&header)?);
                out.reserve(len as usize + 2);
                let start = out.len();
                while file.read_buf(&mut out).await? != 0 {}
                trace!("multipart part {:?}: {} bytes from {}", name, out.len() - start, value);
            }
            None => {
                let header = format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    quote_param(name)
                );
                out.put_slice(&charset.encode(&header)?);
                out.put_slice(&charset.encode(value)?);
            }
        }
        out.put_slice(b"\r\n");
    }
    out.put_slice(b"--");
    out.put_slice(boundary.as_bytes());
    out.put_slice(b"--\r\n");
    Ok(out.freeze())
}

/// Open `value` if it names a regular file. Anything else is a text field.
async fn open_part_file(value: &str) -> Option<(File, u64)> {
    if value.is_empty() {
        return None;
    }
    let meta = match fs::metadata(value).await {
        Ok(m) if m.is_file() => m,
        _ => return None,
    };
    match File::open(value).await {
        Ok(f) => Some((f, meta.len())),
        Err(e) => {
            debug!("multipart value {:?} not readable ({}), sending as text", value, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("scurry-mp-{:x}", rand::random::<u64>()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn boundary_is_stable_and_valid() {
        let b = default_boundary();
        assert!(b.starts_with(BOUNDARY_PREFIX));
        assert_eq!(b, default_boundary());
        assert!(is_valid_boundary(b));
    }

    #[tokio::test]
    async fn text_fields() {
        let mut parts = IndexMap::new();
        parts.insert("a".to_string(), "hello".to_string());
        parts.insert("b".to_string(), "/definitely/not/a/file".to_string());
        let body = encode_multipart(&parts, "XyZ", Charset::Utf8).await.unwrap();
        let expected = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"a\"\r\n\r\nhello\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"b\"\r\n\r\n/definitely/not/a/file\r\n\
            --XyZ--\r\n";
        assert_eq!(&body[..], expected.as_bytes());
    }

    #[tokio::test]
    async fn file_part_has_filename_and_type() {
        let path = temp_file("report.json", b"{\"ok\":true}");
        let mut parts = IndexMap::new();
        parts.insert("upload".to_string(), path.to_string_lossy().into_owned());
        let body = encode_multipart(&parts, "B", Charset::Utf8).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("--B\r\nContent-Disposition: form-data; name=\"upload\"; filename=\"report.json\"\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n\r\n{\"ok\":true}\r\n--B--\r\n"));
    }

    #[tokio::test]
    async fn delimiter_count_is_parts_plus_one() {
        let path = temp_file("data.bin", &[0u8, 1, 2, 255]);
        let mut parts = IndexMap::new();
        parts.insert("f".to_string(), path.to_string_lossy().into_owned());
        parts.insert("x".to_string(), "1".to_string());
        parts.insert("y".to_string(), "2".to_string());
        let body = encode_multipart(&parts, "bnd", Charset::Utf8).await.unwrap();
        let needle = b"--bnd";
        let count = body.windows(needle.len()).filter(|w| w == needle).count();
        assert_eq!(count, parts.len() + 1);
        assert!(body.ends_with(b"--bnd--\r\n"));
    }

    #[tokio::test]
    async fn directory_is_sent_as_text() {
        let dir = std::env::temp_dir();
        let mut parts = IndexMap::new();
        parts.insert("d".to_string(), dir.to_string_lossy().into_owned());
        let body = encode_multipart(&parts, "q", Charset::Utf8).await.unwrap();
        assert!(!String::from_utf8_lossy(&body).contains("filename="));
    }
}
