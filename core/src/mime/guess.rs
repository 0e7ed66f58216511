/*
 * guess.rs
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

//! MIME type from a file name's extension.

use std::path::Path;

use mime::Mime;

/// Guess the MIME type of `path` from its extension; `application/octet-stream` when unknown.
pub fn guess_mime_type(path: &Path) -> Mime {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_ascii_lowercase(),
        None => return mime::APPLICATION_OCTET_STREAM,
    };
    match ext.as_str() {
        "txt" | "text" | "log" => mime::TEXT_PLAIN,
        "htm" | "html" => mime::TEXT_HTML,
        "css" => mime::TEXT_CSS,
        "csv" => mime::TEXT_CSV,
        "xml" => mime::TEXT_XML,
        "js" | "mjs" => mime::TEXT_JAVASCRIPT,
        "json" => mime::APPLICATION_JSON,
        "pdf" => mime::APPLICATION_PDF,
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" | "jpe" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        "bmp" => mime::IMAGE_BMP,
        "svg" => mime::IMAGE_SVG,
        "woff" => mime::FONT_WOFF,
        "woff2" => mime::FONT_WOFF2,
        "msgpack" => mime::APPLICATION_MSGPACK,
        other => guess_uncommon(other),
    }
}

/// Types the `mime` crate has no constant for.
fn guess_uncommon(ext: &str) -> Mime {
    let essence = match ext {
        "zip" => "application/zip",
        "gz" | "tgz" => "application/gzip",
        "tar" => "application/x-tar",
        "wasm" => "application/wasm",
        "webp" => "image/webp",
        "ico" => "image/vnd.microsoft.icon",
        "tif" | "tiff" => "image/tiff",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "md" => "text/markdown",
        "yaml" | "yml" => "application/yaml",
        _ => return mime::APPLICATION_OCTET_STREAM,
    };
    essence.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_extensions() {
        assert_eq!(guess_mime_type(Path::new("a/b/photo.PNG")), mime::IMAGE_PNG);
        assert_eq!(guess_mime_type(Path::new("notes.txt")), mime::TEXT_PLAIN);
        assert_eq!(guess_mime_type(Path::new("x.zip")).essence_str(), "application/zip");
    }

    #[test]
    fn unknown_falls_back_to_octet_stream() {
        assert_eq!(guess_mime_type(Path::new("blob.qqq")), mime::APPLICATION_OCTET_STREAM);
        assert_eq!(guess_mime_type(Path::new("Makefile")), mime::APPLICATION_OCTET_STREAM);
    }
}
