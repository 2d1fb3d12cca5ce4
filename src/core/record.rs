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

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};

/// One structured record from the live log stream.
///
/// Decoded once on arrival and never mutated afterwards. The event id on the
/// wire is a numeric string carrying epoch milliseconds; the payload is a
/// JSON triple `[severity, source, message]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub severity: String,
    pub source: String,
    pub message: String,
}

impl LogRecord {
    /// Decode a single stream event into a record.
    ///
    /// `id` is the effective event id (sticky across frames, as EventSource
    /// defines `lastEventId`), `data` the raw payload text.
    pub fn decode(id: &str, data: &str) -> Result<Self> {
        let millis: i64 = id
            .trim()
            .parse()
            .with_context(|| format!("event id {id:?} is not an epoch-millisecond value"))?;
        let timestamp = Local
            .timestamp_millis_opt(millis)
            .single()
            .with_context(|| format!("event id {millis} is out of timestamp range"))?;

        let (severity, source, message): (String, String, String) = serde_json::from_str(data)
            .context("event payload is not a [severity, source, message] triple")?;

        Ok(LogRecord {
            timestamp,
            severity,
            source,
            message,
        })
    }
}
