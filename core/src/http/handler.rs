/*
 * handler.rs
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

//! Streaming body callback.
//!
//! When a request carries a callback, a fixed-length response body is handed
//! to it chunk by chunk as it arrives instead of being buffered, and the
//! response body becomes a sentinel holding the callback's name.

/// Receiver for response body chunks.
pub trait BodyCallback: Send + Sync {
    /// Name recorded in the response in place of the body.
    fn name(&self) -> &str;

    /// Called for each chunk of body data. Data is only valid for the duration of the call.
    fn on_chunk(&mut self, data: &[u8]);

    /// Called once the declared body length has been read.
    fn on_complete(&mut self) {}
}

/// A closure with a name.
pub struct NamedCallback<F> {
    name: String,
    f: F,
}

impl<F> NamedCallback<F>
where
    F: FnMut(&[u8]) + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> BodyCallback for NamedCallback<F>
where
    F: FnMut(&[u8]) + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_chunk(&mut self, data: &[u8]) {
        (self.f)(data)
    }
}
