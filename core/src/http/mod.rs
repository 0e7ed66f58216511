/*
 * mod.rs
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

//! HTTP/1.1 request/response engine.
//!
//! - Requests are described by a `RequestSpec`, assembled into wire bytes and
//!   written to a caller-supplied `Connection`.
//! - Responses are push-parsed (`h1`) into a `ResponseRecord`; fixed-length
//!   bodies can be streamed to a `BodyCallback` instead of buffered.
//! - Redirects are followed on the same connection with an explicit method
//!   table and a redirect budget; superseded responses form the history.
//! - Buffers: `bytes` crate (BytesMut for the read buffer, Bytes for bodies).

mod body;
mod decode;
mod handler;
mod headers;
mod request;
mod response;

pub mod assembler;
pub mod cookie;
pub mod h1;
pub mod redirect;

pub use body::{build_body, encode_form, encode_json, EncodedBody};
pub use decode::decode_content;
pub use handler::{BodyCallback, NamedCallback};
pub use headers::Headers;
pub use request::{FormData, Method, RequestSpec};
pub use response::{receive, Body, ResponseRecord, REDIRECT_STATUSES};

pub mod client;
pub mod connection;

pub use assembler::{assemble, AssembledRequest};
pub use client::HttpClient;
pub use connection::Connection;
pub use cookie::{Cookie, CookieStore};
pub use redirect::{Redirect, RedirectController, RedirectState};
