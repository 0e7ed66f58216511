/*
 * redirect.rs
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

//! Redirect decisions: whether to follow, where to, and with which method.

use log::debug;

use crate::error::{HttpError, Result};
use crate::http::request::{Method, RequestSpec};
use crate::http::response::{ResponseRecord, REDIRECT_STATUSES};
use crate::uri::{resolve_location, TargetUri};

/// What happens to the method when following a redirect status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodPolicy {
    /// Reissue as `GET` without a body.
    SwitchToGet,
    Preserve,
}

/// Method handling per redirect status. `None` for non-redirect statuses.
pub fn method_policy(status: u16) -> Option<MethodPolicy> {
    match status {
        301..=303 => Some(MethodPolicy::SwitchToGet),
        307 | 308 => Some(MethodPolicy::Preserve),
        _ => None,
    }
}

/// A redirect to follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
    pub method: Method,
}

impl Redirect {
    /// The next hop's request: new URI and method, params consumed, body
    /// sources dropped when the method became `GET`.
    pub fn apply(self, mut spec: RequestSpec) -> RequestSpec {
        let downgraded = self.method != spec.method;
        spec.uri = self.location;
        spec.method = self.method;
        spec.params = None;
        // The location carries its own authority.
        spec.port = None;
        if downgraded {
            spec.data = None;
            spec.files = None;
            spec.json = None;
        }
        spec
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectState {
    AwaitingRedirectCheck,
    Redirecting(Redirect),
    Done,
}

/// Redirect budget for one logical request.
#[derive(Debug, Clone)]
pub struct RedirectController {
    budget: i64,
    max: Option<u32>,
    state: RedirectState,
}

impl RedirectController {
    /// `None` means redirects are followed without limit.
    pub fn new(max_redirects: Option<u32>) -> Self {
        Self {
            budget: max_redirects.map(i64::from).unwrap_or(i64::MAX),
            max: max_redirects,
            state: RedirectState::AwaitingRedirectCheck,
        }
    }

    pub fn state(&self) -> &RedirectState {
        &self.state
    }

    /// Decide what follows `response`, received for a request to `current`
    /// made with `method`. Spends one unit of budget per redirect taken.
    pub fn inspect(
        &mut self,
        method: Method,
        current: &TargetUri,
        response: &ResponseRecord,
    ) -> Result<&RedirectState> {
        self.state = self.decide(method, current, response)?;
        Ok(&self.state)
    }

    fn decide(&mut self, method: Method, current: &TargetUri, response: &ResponseRecord) -> Result<RedirectState> {
        if method == Method::Head || !REDIRECT_STATUSES.contains(&response.status_code) {
            return Ok(RedirectState::Done);
        }
        let Some(location) = response.header("location") else {
            return Ok(RedirectState::Done);
        };
        let Some(policy) = method_policy(response.status_code) else {
            return Ok(RedirectState::Done);
        };
        self.budget -= 1;
        if self.budget < 0 {
            return Err(HttpError::TooManyRedirects {
                max: self.max.unwrap_or(u32::MAX),
            });
        }
        let method = match policy {
            MethodPolicy::SwitchToGet => Method::Get,
            MethodPolicy::Preserve => method,
        };
        let location = resolve_location(current, location);
        debug!("{} redirect to {} as {}", response.status_code, location, method);
        Ok(RedirectState::Redirecting(Redirect { location, method }))
    }
}
