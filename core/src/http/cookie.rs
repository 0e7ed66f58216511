/*
 * cookie.rs
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

//! Cookies: `Set-Cookie` parsing, the `Cookie` request header, and the
//! cookie-store collaborator the engine reads from and reports to.

use indexmap::IndexMap;

use crate::http::response::ResponseRecord;

/// A cookie received in a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// Domain attribute without a leading dot, else the request host.
    pub domain: String,
    /// True when no Domain attribute was given.
    pub host_only: bool,
    pub path: String,
    pub expires: Option<String>,
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
}

/// Parse one `Set-Cookie` value. Returns `None` when there is no `name=value` pair.
pub fn parse_set_cookie(header: &str, request_host: &str) -> Option<Cookie> {
    let mut attrs = header.split(';');
    let (name, value) = attrs.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let mut cookie = Cookie {
        name: name.to_string(),
        value: value.trim().trim_matches('"').to_string(),
        domain: request_host.to_ascii_lowercase(),
        host_only: true,
        path: "/".to_string(),
        expires: None,
        max_age: None,
        secure: false,
        http_only: false,
    };
    for attr in attrs {
        let (key, val) = match attr.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (attr.trim(), ""),
        };
        match key.to_ascii_lowercase().as_str() {
            "domain" if !val.is_empty() => {
                cookie.domain = val.trim_start_matches('.').to_ascii_lowercase();
                cookie.host_only = false;
            }
            "path" if val.starts_with('/') => cookie.path = val.to_string(),
            "expires" if !val.is_empty() => cookie.expires = Some(val.to_string()),
            "max-age" => cookie.max_age = val.parse().ok(),
            "secure" => cookie.secure = true,
            "httponly" => cookie.http_only = true,
            _ => {}
        }
    }
    Some(cookie)
}

/// `Cookie` header value: `k=v; k2=v2`, or `None` when there are no cookies.
pub fn cookie_header(cookies: &IndexMap<String, String>) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    let pairs: Vec<String> = cookies.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    Some(pairs.join("; "))
}

/// Cookie jar owned by the session layer. The engine asks it for cookies
/// before each request and hands it every response it receives, including
/// the ones superseded by redirects. Implementations synchronize internally;
/// many requests may call them concurrently.
pub trait CookieStore: Send + Sync {
    /// Cookies applicable to a request for `host` and `path`.
    fn additional_cookies(&self, host: &str, path: &str) -> IndexMap<String, String>;

    /// Record the cookies of a received response.
    fn store(&self, response: &ResponseRecord);
}
