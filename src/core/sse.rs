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

//! Incremental parser for server-sent event streams.
//!
//! Bytes arrive in arbitrary chunks; [`FrameReader::feed`] buffers them and
//! yields every complete frame. A frame ends at a blank line (LF LF or
//! CRLF CRLF), `data:` lines accumulate and join with newlines, and comment
//! lines (leading `:`) are skipped.

/// One parsed event frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event id, if the frame carried one.
    pub id: Option<String>,
    /// Event type label, if any.
    pub event: Option<String>,
    /// Payload: all `data:` lines joined with `\n`.
    pub data: Option<String>,
    /// Reconnect delay requested by the server, in milliseconds.
    pub retry: Option<u64>,
}

/// Stateful frame assembler for a single connection.
///
/// Create one per connection attempt; leftover partial frames must not
/// survive a reconnect.
#[derive(Debug, Default)]
pub struct FrameReader {
    buf: Vec<u8>,
}

impl FrameReader {
    #[must_use]
    pub const fn new() -> Self {
        FrameReader { buf: Vec::new() }
    }

    /// Append a chunk of bytes and return every frame completed by it.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        self.buf.extend_from_slice(bytes);

        let mut frames = Vec::new();
        while let Some((frame_len, separator_len)) = find_frame_end(&self.buf) {
            let text = String::from_utf8_lossy(&self.buf[..frame_len]).into_owned();
            if let Some(frame) = parse_frame(&text) {
                frames.push(frame);
            }
            self.buf.drain(..frame_len + separator_len);
        }
        frames
    }
}

/// Locate the first frame terminator. Returns the frame length and the
/// length of the terminating separator.
fn find_frame_end(buf: &[u8]) -> Option<(usize, usize)> {
    for i in 0..buf.len() {
        if buf[i..].starts_with(b"\r\n\r\n") {
            return Some((i, 4));
        }
        if buf[i..].starts_with(b"\n\n") {
            return Some((i, 2));
        }
    }
    None
}

/// Parse the text of one frame. Returns `None` for frames that carry no
/// fields at all (e.g. pure comments or keep-alives).
fn parse_frame(text: &str) -> Option<SseFrame> {
    let mut data_lines: Vec<&str> = Vec::new();
    let mut id = None;
    let mut event = None;
    let mut retry = None;

    for line in text.lines() {
        if line.starts_with(':') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        } else if let Some(rest) = line.strip_prefix("id:") {
            id = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("event:") {
            event = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("retry:") {
            if let Ok(ms) = rest.trim().parse() {
                retry = Some(ms);
            }
        }
    }

    if data_lines.is_empty() && id.is_none() && event.is_none() && retry.is_none() {
        return None;
    }

    Some(SseFrame {
        id,
        event,
        data: if data_lines.is_empty() {
            None
        } else {
            Some(data_lines.join("\n"))
        },
        retry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut reader = FrameReader::new();
        let frames = reader.feed(b"id: 1000\ndata: [\"ERROR\",\"auth\",\"login failed\"]\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id.as_deref(), Some("1000"));
        assert_eq!(
            frames[0].data.as_deref(),
            Some(r#"["ERROR","auth","login failed"]"#)
        );
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut reader = FrameReader::new();
        assert!(reader.feed(b"id: 42\nda").is_empty());
        assert!(reader.feed(b"ta: hello").is_empty());
        let frames = reader.feed(b"\n\nid: 43\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id.as_deref(), Some("42"));
        assert_eq!(frames[0].data.as_deref(), Some("hello"));

        // The second frame completes later
        let frames = reader.feed(b"data: world\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id.as_deref(), Some("43"));
        assert_eq!(frames[0].data.as_deref(), Some("world"));
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut reader = FrameReader::new();
        let frames = reader.feed(b"data: one\n\ndata: two\n\ndata: three\n\n");
        let payloads: Vec<_> = frames.iter().filter_map(|f| f.data.as_deref()).collect();
        assert_eq!(payloads, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_multiline_data_joined_with_newline() {
        let mut reader = FrameReader::new();
        let frames = reader.feed(b"data: first line\ndata: second line\n\n");
        assert_eq!(frames[0].data.as_deref(), Some("first line\nsecond line"));
    }

    #[test]
    fn test_crlf_frames() {
        let mut reader = FrameReader::new();
        let frames = reader.feed(b"id: 7\r\ndata: crlf payload\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id.as_deref(), Some("7"));
        assert_eq!(frames[0].data.as_deref(), Some("crlf payload"));
    }

    #[test]
    fn test_comment_only_frame_is_skipped() {
        let mut reader = FrameReader::new();
        assert!(reader.feed(b": keep-alive\n\n").is_empty());
    }

    #[test]
    fn test_retry_and_event_fields() {
        let mut reader = FrameReader::new();
        let frames = reader.feed(b"event: update\nretry: 5000\ndata: x\n\n");
        assert_eq!(frames[0].event.as_deref(), Some("update"));
        assert_eq!(frames[0].retry, Some(5000));

        // Unparsable retry is ignored
        let frames = reader.feed(b"retry: soon\ndata: y\n\n");
        assert_eq!(frames[0].retry, None);
    }

    #[test]
    fn test_data_without_leading_space() {
        let mut reader = FrameReader::new();
        let frames = reader.feed(b"data:tight\n\n");
        assert_eq!(frames[0].data.as_deref(), Some("tight"));
    }
}
