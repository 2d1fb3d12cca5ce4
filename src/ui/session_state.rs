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

//! State of one viewing session, fed by stream messages.
//!
//! Kept separate from the egui app so the reaction to every stream message
//! is a plain state transition that tests can drive without a window or a
//! network connection.

use crate::core::{AutoScroll, LogStore, StreamMessage};

/// Connection phase shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Live,
    Retrying,
}

/// UI follow-up requested by one applied stream message.
#[derive(Debug, PartialEq, Eq)]
pub enum StreamEffect {
    /// Nothing beyond a repaint
    None,
    /// A row was appended; scroll it into view if the viewport is pinned
    Appended,
    /// The connection dropped; surface the reason once
    Lost(String),
}

/// Everything that changes over the lifetime of a session.
pub struct SessionState {
    pub store: LogStore,
    pub autoscroll: AutoScroll,
    /// Latched by the first denied authorization check; never cleared.
    pub access_denied: bool,
    pub connection: ConnectionState,
}

impl SessionState {
    #[must_use]
    pub const fn new() -> Self {
        SessionState {
            store: LogStore::new(),
            autoscroll: AutoScroll::new(),
            access_denied: false,
            connection: ConnectionState::Connecting,
        }
    }

    /// Apply one message from the stream thread.
    pub fn apply(&mut self, message: StreamMessage) -> StreamEffect {
        match message {
            StreamMessage::Connected => {
                self.connection = ConnectionState::Live;
                StreamEffect::None
            }
            StreamMessage::Record(record) => {
                self.store.push(record);
                StreamEffect::Appended
            }
            StreamMessage::Disconnected(reason) => {
                self.connection = ConnectionState::Retrying;
                StreamEffect::Lost(reason)
            }
            StreamMessage::AccessDenied => {
                // Re-setting the flag leaves text and visibility unchanged
                self.access_denied = true;
                StreamEffect::None
            }
        }
    }

    /// One-line summary for the status bar.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.connection {
            ConnectionState::Connecting => "Connecting...".to_string(),
            ConnectionState::Live => format!("Live - {} records", self.store.len()),
            ConnectionState::Retrying => {
                format!("Connection lost, retrying - {} records", self.store.len())
            }
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogRecord;

    fn record(message: &str) -> LogRecord {
        LogRecord::decode("1000", &format!(r#"["ERROR","auth",{}]"#, serde_json::json!(message)))
            .expect("test record decodes")
    }

    #[test]
    fn test_records_append_in_arrival_order_while_pinned() {
        let mut state = SessionState::new();
        assert!(state.autoscroll.is_pinned());

        let effect = state.apply(StreamMessage::Record(record("login failed")));
        assert_eq!(effect, StreamEffect::Appended);
        assert_eq!(state.store.len(), 1);
        // Arrival only reads the auto-scroll state, it never writes it
        assert!(state.autoscroll.is_pinned());
    }

    #[test]
    fn test_record_arrival_does_not_repin_a_free_viewport() {
        use crate::core::ScrollMetrics;

        let mut state = SessionState::new();
        // User scrolls up: viewport becomes free
        state.autoscroll.on_scroll(ScrollMetrics {
            offset: 100.0,
            content_height: 1000.0,
            viewport_height: 300.0,
        });
        state.autoscroll.on_scroll(ScrollMetrics {
            offset: 50.0,
            content_height: 1000.0,
            viewport_height: 300.0,
        });
        assert!(!state.autoscroll.is_pinned());

        state.apply(StreamMessage::Record(record("ignored by autoscroll")));
        assert!(!state.autoscroll.is_pinned());
    }

    #[test]
    fn test_access_denied_is_idempotent() {
        let mut state = SessionState::new();
        state.apply(StreamMessage::Disconnected("stream closed".to_string()));
        state.apply(StreamMessage::AccessDenied);
        assert!(state.access_denied);

        // A second denial changes nothing
        state.apply(StreamMessage::Disconnected("stream closed".to_string()));
        state.apply(StreamMessage::AccessDenied);
        assert!(state.access_denied);
    }

    #[test]
    fn test_connection_state_follows_stream() {
        let mut state = SessionState::new();
        assert_eq!(state.connection, ConnectionState::Connecting);

        state.apply(StreamMessage::Connected);
        assert_eq!(state.connection, ConnectionState::Live);

        let effect = state.apply(StreamMessage::Disconnected("boom".to_string()));
        assert_eq!(effect, StreamEffect::Lost("boom".to_string()));
        assert_eq!(state.connection, ConnectionState::Retrying);

        state.apply(StreamMessage::Connected);
        assert_eq!(state.connection, ConnectionState::Live);
    }

    #[test]
    fn test_records_still_append_after_denial() {
        let mut state = SessionState::new();
        state.apply(StreamMessage::AccessDenied);
        state.apply(StreamMessage::Record(record("still flowing")));
        assert_eq!(state.store.len(), 1);
    }
}
