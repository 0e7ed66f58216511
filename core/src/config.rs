/*
 * config.rs
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

//! Client-wide defaults applied to every new request.

use std::time::Duration;

use crate::charset::Charset;

/// Default client identifier sent as `User-Agent`.
pub const DEFAULT_USER_AGENT: &str = concat!("scurry/", env!("CARGO_PKG_VERSION"));

/// Default redirect budget.
pub const DEFAULT_MAX_REDIRECTS: u32 = 20;

/// Defaults for requests created through an [`HttpClient`](crate::http::HttpClient).
/// Each field can still be overridden per request on the `RequestSpec`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `User-Agent` header value. Default: `scurry/<version>`.
    pub user_agent: String,
    /// Deadline for the status line and headers of each response.
    /// Default: `None` (wait indefinitely).
    pub timeout: Option<Duration>,
    /// Redirects followed before failing. Default: `Some(20)`; `None` is unlimited.
    pub max_redirects: Option<u32>,
    /// Charset for request text and response decoding. Default: UTF-8.
    pub encoding: Charset,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            max_redirects: Some(DEFAULT_MAX_REDIRECTS),
            encoding: Charset::Utf8,
        }
    }
}

impl ClientConfig {
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_redirects(mut self, max: Option<u32>) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn encoding(mut self, encoding: Charset) -> Self {
        self.encoding = encoding;
        self
    }
}
