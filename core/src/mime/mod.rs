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

//! MIME pieces used when building request bodies: multipart/form-data
//! encoding, extension-based type guessing, boundary rules.

mod guess;
mod multipart;
mod utils;

pub use guess::guess_mime_type;
pub use multipart::{default_boundary, encode_multipart, multipart_content_type};
pub use utils::{is_boundary_char, is_valid_boundary, quote_param};
