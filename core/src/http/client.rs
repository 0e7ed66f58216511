/*
 * client.rs
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

//! HTTP client: send a request over an established connection, following redirects.

use std::sync::Arc;

use log::debug;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::assembler::assemble;
use crate::http::connection::Connection;
use crate::http::cookie::CookieStore;
use crate::http::h1::H1Stream;
use crate::http::handler::BodyCallback;
use crate::http::redirect::{RedirectController, RedirectState};
use crate::http::request::{Method, RequestSpec};
use crate::http::response::{receive, ResponseRecord};

/// HTTP client. Holds client-wide defaults and an optional cookie store; the
/// caller supplies the connection for each call.
#[derive(Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
    cookie_store: Option<Arc<dyn CookieStore>>,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            cookie_store: None,
        }
    }

    pub fn with_cookie_store(mut self, store: Arc<dyn CookieStore>) -> Self {
        self.cookie_store = Some(store);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a request carrying this client's defaults.
    pub fn request(&self, method: Method, uri: impl Into<String>) -> RequestSpec {
        RequestSpec::with_config(method, uri, &self.config)
    }

    /// Send `spec` over `conn` and return the final response. Every response
    /// superseded by a redirect is in the returned record's history, and every
    /// response (final or not) is reported to the cookie store.
    pub async fn send<C: Connection>(&self, conn: &mut C, spec: RequestSpec) -> Result<ResponseRecord> {
        let mut spec = spec;
        let mut redirects = RedirectController::new(spec.max_redirects);
        let mut history: Vec<ResponseRecord> = Vec::new();
        let mut stream = H1Stream::new(conn);
        let store = self.cookie_store.as_deref();

        loop {
            let request = assemble(&spec, store).await?;
            debug!("> {}", request.request_line);
            stream.write(&request.to_bytes(spec.encoding)?).await?;

            let callback = spec
                .callback
                .as_mut()
                .map(|cb| cb.as_mut() as &mut dyn BodyCallback);
            let mut response = receive(
                &mut stream,
                spec.method,
                &request.target,
                spec.timeout,
                callback,
                spec.encoding,
            )
            .await?;
            if let Some(store) = store {
                store.store(&response);
            }

            match redirects.inspect(spec.method, &request.target, &response)? {
                RedirectState::Redirecting(redirect) => {
                    let redirect = redirect.clone();
                    debug!("hop {}: {} {}", history.len() + 1, redirect.method, redirect.location);
                    history.push(response);
                    spec = redirect.apply(spec);
                }
                _ => {
                    response.history = history;
                    return Ok(response);
                }
            }
        }
    }
}
