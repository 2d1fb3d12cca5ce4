// LiveCrab - GPL-3.0-or-later
// This file is part of LiveCrab.
//
// Copyright (C) 2025 Daniel Freiermuth
//
// LiveCrab is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LiveCrab is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LiveCrab.  If not, see <https://www.gnu.org/licenses/>.

//! Authorization check against the server's identity endpoint.
//!
//! Only consulted after a transport error on the log stream; the result is
//! never cached, every error triggers a fresh check.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;

/// Role label that gates access to the live log stream.
pub const ADMIN_TAG: &str = "administrator";

const WHOAMI_PATH: &str = "api/whoami";

/// Shape of the identity endpoint's response body.
#[derive(Debug, Deserialize)]
struct Identity {
    tags: Vec<String>,
}

/// Ask the server who we are and whether the administrator tag is present.
pub fn fetch_is_administrator(client: &Client, base: &Url) -> Result<bool> {
    let url = base.join(WHOAMI_PATH).context("building whoami URL")?;
    let body = client
        .get(url)
        .send()
        .context("requesting identity")?
        .error_for_status()
        .context("identity endpoint rejected the request")?
        .text()
        .context("reading identity response")?;
    is_administrator(&body)
}

/// Parse an identity body and test for the administrator tag.
pub fn is_administrator(body: &str) -> Result<bool> {
    let identity: Identity =
        serde_json::from_str(body).context("identity response is not valid JSON")?;
    Ok(identity.tags.iter().any(|tag| tag == ADMIN_TAG))
}
