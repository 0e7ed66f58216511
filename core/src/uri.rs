/*
 * uri.rs
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

//! Target URIs: split `scheme://authority/path?query#fragment`, derive the
//! port and `Host` header, and resolve redirect `Location` values.

use url::Url;

use crate::error::{HttpError, Result};

pub const HTTP_PORT: u16 = 80;
pub const HTTPS_PORT: u16 = 443;

/// Port implied by a scheme: 443 for https, 80 for everything else.
pub fn default_port(scheme: &str) -> u16 {
    if scheme.eq_ignore_ascii_case("https") {
        HTTPS_PORT
    } else {
        HTTP_PORT
    }
}

/// A parsed request target. The fragment is never sent and is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUri {
    /// Lowercased scheme.
    pub scheme: String,
    /// Host without port or userinfo. Keeps brackets for IPv6 literals.
    pub host: String,
    pub port: u16,
    /// Normalized path; `/` for http(s), may be empty for other schemes.
    pub path: String,
    /// Query without the leading `?`; may be empty.
    pub query: String,
}

impl TargetUri {
    /// Parse `uri`. Port precedence: port in the URI, then `fallback_port`,
    /// then the scheme default. A port equal to the scheme default is
    /// normalized away by the parser and counts as absent.
    ///
    /// An authority whose port does not parse is kept whole as the host and
    /// the port falls back as if none were given.
    pub fn parse(uri: &str, fallback_port: Option<u16>) -> Result<Self> {
        let uri = uri.trim();
        match Url::parse(uri) {
            Ok(url) => Self::from_url(&url, fallback_port, None)
                .ok_or_else(|| HttpError::InvalidUri(uri.to_string())),
            Err(url::ParseError::InvalidPort) => Self::parse_bad_port(uri, fallback_port)
                .ok_or_else(|| HttpError::InvalidUri(uri.to_string())),
            Err(_) => Err(HttpError::InvalidUri(uri.to_string())),
        }
    }

    fn from_url(url: &Url, fallback_port: Option<u16>, host: Option<String>) -> Option<Self> {
        let parsed_host = url.host_str().filter(|h| !h.is_empty())?;
        let scheme = url.scheme().to_string();
        let port = url
            .port()
            .or(fallback_port)
            .unwrap_or_else(|| default_port(&scheme));
        Some(Self {
            host: host.unwrap_or_else(|| parsed_host.to_string()),
            port,
            path: url.path().to_string(),
            query: url.query().unwrap_or("").to_string(),
            scheme,
        })
    }

    /// `scheme://host:junk/...`: parse without the port, then keep the whole
    /// authority as the host.
    fn parse_bad_port(uri: &str, fallback_port: Option<u16>) -> Option<Self> {
        let (scheme, rest) = uri.split_once("://")?;
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        let (authority, tail) = rest.split_at(end);
        let authority = authority.rsplit('@').next().unwrap_or(authority);
        let (bare, _) = authority.rsplit_once(':')?;
        let url = Url::parse(&format!("{}://{}{}", scheme, bare, tail)).ok()?;
        Self::from_url(&url, None, Some(authority.to_string())).map(|mut t| {
            t.port = fallback_port.unwrap_or_else(|| default_port(&t.scheme));
            t
        })
    }

    pub fn is_default_port(&self) -> bool {
        self.port == default_port(&self.scheme)
    }

    /// `Host` header value: bare host on the scheme's default port, else `host:port`.
    pub fn host_header(&self) -> String {
        if self.is_default_port() {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Path for cookie lookup: the URI path, `/` when empty.
    pub fn cookie_path(&self) -> &str {
        if self.path.is_empty() {
            "/"
        } else {
            &self.path
        }
    }

    /// Absolute form, `scheme://host[:port]/path[?query]`.
    pub fn to_uri_string(&self) -> String {
        let mut s = format!("{}://{}{}", self.scheme, self.host_header(), self.cookie_path());
        if !self.query.is_empty() {
            s.push('?');
            s.push_str(&self.query);
        }
        s
    }
}

/// Resolve a redirect `Location` against the URI that produced it.
///
/// A value with a host is absolute and replaces the URI outright; `//host/...`
/// keeps the current scheme. Anything else keeps the current scheme and
/// authority and is rooted at `/`: `next` from `/a/b` goes to `/next`, not
/// `/a/next` as `Url::join` would have it.
pub fn resolve_location(current: &TargetUri, location: &str) -> String {
    let location = location.trim();
    if location.starts_with("//") {
        return format!("{}:{}", current.scheme, location);
    }
    if Url::parse(location).is_ok_and(|u| u.has_host()) {
        return location.to_string();
    }
    let mut out = format!("{}://{}", current.scheme, current.host_header());
    if !location.starts_with('/') {
        out.push('/');
    }
    out.push_str(location);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_by_scheme() {
        let t = TargetUri::parse("http://example.com/a?x=1", None).unwrap();
        assert_eq!(t.port, 80);
        assert_eq!(t.host_header(), "example.com");
        assert_eq!(t.path, "/a");
        assert_eq!(t.query, "x=1");

        let t = TargetUri::parse("https://example.com:443/", None).unwrap();
        assert_eq!(t.port, 443);
        assert_eq!(t.host_header(), "example.com");
    }

    #[test]
    fn explicit_port_in_host_header() {
        let t = TargetUri::parse("http://localhost:8080", None).unwrap();
        assert_eq!(t.host, "localhost");
        assert_eq!(t.port, 8080);
        assert_eq!(t.host_header(), "localhost:8080");
        assert_eq!(t.path, "/");
        assert_eq!(t.cookie_path(), "/");
    }

    #[test]
    fn fallback_port_used_when_uri_has_none() {
        let t = TargetUri::parse("http://example.com/", Some(8000)).unwrap();
        assert_eq!(t.port, 8000);
        let t = TargetUri::parse("http://example.com:81/", Some(8000)).unwrap();
        assert_eq!(t.port, 81);
    }

    #[test]
    fn unparsable_port_defaults_by_scheme() {
        let t = TargetUri::parse("https://example.com:abc/x", None).unwrap();
        assert_eq!(t.host, "example.com:abc");
        assert_eq!(t.port, 443);
        assert_eq!(t.path, "/x");
        let t = TargetUri::parse("http://u@h:99999/", Some(8000)).unwrap();
        assert_eq!(t.host, "h:99999");
        assert_eq!(t.port, 8000);
    }

    #[test]
    fn scheme_and_host_are_lowercased() {
        let t = TargetUri::parse("HTTP://Example.COM/Path?Q=1", None).unwrap();
        assert_eq!(t.scheme, "http");
        assert_eq!(t.host, "example.com");
        assert_eq!(t.path, "/Path");
        assert_eq!(t.query, "Q=1");
    }

    #[test]
    fn ipv6_and_userinfo() {
        let t = TargetUri::parse("http://[::1]:8080/p", None).unwrap();
        assert_eq!(t.host, "[::1]");
        assert_eq!(t.port, 8080);
        let t = TargetUri::parse("http://user:pw@example.com/p#frag", None).unwrap();
        assert_eq!(t.host, "example.com");
        assert_eq!(t.port, 80);
        assert_eq!(t.path, "/p");
    }

    #[test]
    fn rejects_uri_without_host() {
        assert!(TargetUri::parse("/just/a/path", None).is_err());
        assert!(TargetUri::parse("http://", None).is_err());
        assert!(TargetUri::parse("mailto:someone@example.com", None).is_err());
    }

    #[test]
    fn relative_location_keeps_scheme_and_authority() {
        let cur = TargetUri::parse("http://example.com:8080/a/b", None).unwrap();
        assert_eq!(resolve_location(&cur, "/c?d=1"), "http://example.com:8080/c?d=1");
        assert_eq!(resolve_location(&cur, "c"), "http://example.com:8080/c");
        assert_eq!(resolve_location(&cur, " /x "), "http://example.com:8080/x");
    }

    #[test]
    fn absolute_location_replaces_uri() {
        let cur = TargetUri::parse("https://example.com/a", None).unwrap();
        assert_eq!(resolve_location(&cur, "http://other.org/z"), "http://other.org/z");
        assert_eq!(resolve_location(&cur, "//cdn.example.com/z"), "https://cdn.example.com/z");
    }
}
