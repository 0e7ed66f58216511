/*
 * lib.rs
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

//! Scurry core: the request/response engine of an asynchronous HTTP/1.1 client.
//!
//! Encodes query strings and request bodies (urlencoded, multipart, JSON),
//! assembles requests, reconstructs responses from the byte stream and
//! follows redirects. Connection setup, TLS and cookie persistence belong to
//! the caller.

pub mod charset;
pub mod config;
pub mod error;
pub mod http;
pub mod mime;
pub mod query;
pub mod uri;

pub use charset::Charset;
pub use config::ClientConfig;
pub use error::{HttpError, Result};
pub use http::{HttpClient, Method, RequestSpec, ResponseRecord};
pub use query::{ParamValue, Params};
