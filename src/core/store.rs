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

//! Append-only storage for the records of one viewing session.
//!
//! Row order is exactly arrival order: records are never reordered,
//! deduplicated or evicted. Full-session history stays visible, so the
//! store grows without bound by design.

use crate::core::record::LogRecord;

/// Insertion-ordered record store backing the live table.
#[derive(Debug, Default)]
pub struct LogStore {
    records: Vec<LogRecord>,
}

impl LogStore {
    #[must_use]
    pub const fn new() -> Self {
        LogStore {
            records: Vec::new(),
        }
    }

    /// Append a record at the end. The only mutation the store supports.
    pub fn push(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    /// All records in arrival order.
    #[must_use]
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
