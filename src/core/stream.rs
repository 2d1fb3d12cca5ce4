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

//! Background consumer for the server's live log stream.
//!
//! A dedicated thread holds a long-lived HTTP connection to the event
//! stream, feeds the bytes through the SSE frame parser, decodes records and
//! sends them to the UI over an mpsc channel. On a transport error it runs a
//! single best-effort authorization check, then reconnects EventSource-style
//! (server `retry:` delay, `Last-Event-ID` replay). Dropping the handle
//! closes the connection.

use crate::core::identity;
use crate::core::record::LogRecord;
use crate::core::sse::FrameReader;
use anyhow::{Context as _, Result};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const LIVELOG_PATH: &str = "api/livelog";

/// Reconnect delay until the server overrides it with a `retry:` field.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// How often the reconnect wait re-checks the stop flag.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Messages sent from the stream thread to the UI
pub enum StreamMessage {
    /// The stream connection is established
    Connected,
    /// One decoded record, in arrival order
    Record(LogRecord),
    /// The connection failed or ended; a reconnect attempt follows
    Disconnected(String),
    /// An identity check after a transport error found no administrator tag
    AccessDenied,
}

/// Handle owning the background stream thread.
///
/// Dropping it (or calling [`close`](Self::close)) stops the reconnect loop,
/// which is the explicit teardown of the connection.
pub struct LiveLogStream {
    stop: Arc<AtomicBool>,
}

impl LiveLogStream {
    /// Connect to the live log stream of the server at `base` and start
    /// streaming in the background. Returns the handle and the message
    /// channel for the UI to drain.
    pub fn connect(base: Url, ctx: egui::Context) -> (Self, Receiver<StreamMessage>) {
        let (tx, rx) = channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        thread::spawn(move || {
            match Client::builder().timeout(None).build() {
                Ok(client) => stream_loop(&client, &base, &tx, &ctx, &stop_flag),
                Err(e) => {
                    log::error!("failed to build HTTP client: {e}");
                    let _ = tx.send(StreamMessage::Disconnected(format!(
                        "failed to build HTTP client: {e}"
                    )));
                    ctx.request_repaint();
                }
            }
            log::debug!("live log stream thread shutting down");
        });

        (LiveLogStream { stop }, rx)
    }

    /// Stop the stream thread after its current read returns.
    pub fn close(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for LiveLogStream {
    fn drop(&mut self) {
        self.close();
    }
}

fn stream_loop(
    client: &Client,
    base: &Url,
    tx: &Sender<StreamMessage>,
    ctx: &egui::Context,
    stop: &AtomicBool,
) {
    let mut last_event_id: Option<String> = None;
    let mut retry_delay = DEFAULT_RETRY_DELAY;

    while !stop.load(Ordering::Relaxed) {
        match open_stream(client, base, last_event_id.as_deref()) {
            Ok(response) => {
                log::info!("connected to live log stream at {base}");
                let _ = tx.send(StreamMessage::Connected);
                ctx.request_repaint();

                let outcome = read_stream(
                    response,
                    tx,
                    ctx,
                    stop,
                    &mut last_event_id,
                    &mut retry_delay,
                );
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                match outcome {
                    Ok(()) => handle_transport_error(client, base, "stream closed by server", tx, ctx),
                    Err(e) => handle_transport_error(client, base, &format!("{e:#}"), tx, ctx),
                }
            }
            Err(e) => {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                handle_transport_error(client, base, &format!("{e:#}"), tx, ctx);
            }
        }

        wait_for_retry(retry_delay, stop);
    }
}

/// Open the event-stream request, replaying the last seen event id.
fn open_stream(client: &Client, base: &Url, last_event_id: Option<&str>) -> Result<Response> {
    let url = base.join(LIVELOG_PATH).context("building live log URL")?;
    let mut request = client
        .get(url)
        .header(reqwest::header::ACCEPT, "text/event-stream");
    if let Some(id) = last_event_id {
        request = request.header("Last-Event-ID", id);
    }
    request
        .send()
        .context("connecting to live log stream")?
        .error_for_status()
        .context("live log stream refused")
}

/// Pump one open connection until it ends, errors, or the stop flag is set.
///
/// Frames update the sticky event id and the retry delay; each `data:`
/// payload is decoded and forwarded. A malformed payload is dropped with a
/// warning, it never ends the stream.
fn read_stream<R: Read>(
    mut stream: R,
    tx: &Sender<StreamMessage>,
    ctx: &egui::Context,
    stop: &AtomicBool,
    last_event_id: &mut Option<String>,
    retry_delay: &mut Duration,
) -> Result<()> {
    let mut reader = FrameReader::new();
    let mut chunk = [0u8; 8192];

    loop {
        if stop.load(Ordering::Relaxed) {
            return Ok(());
        }
        let n = stream
            .read(&mut chunk)
            .context("reading from event stream")?;
        if n == 0 {
            return Ok(());
        }

        for frame in reader.feed(&chunk[..n]) {
            if let Some(ms) = frame.retry {
                log::debug!("server set reconnect delay to {ms} ms");
                *retry_delay = Duration::from_millis(ms);
            }
            if let Some(id) = frame.id {
                *last_event_id = Some(id);
            }
            let Some(data) = frame.data else {
                continue;
            };
            // Only default "message" events carry records
            if frame.event.as_deref().is_some_and(|event| event != "message") {
                log::trace!("ignoring event of type {:?}", frame.event);
                continue;
            }
            let id = last_event_id.as_deref().unwrap_or_default();
            match LogRecord::decode(id, &data) {
                Ok(record) => {
                    let _ = tx.send(StreamMessage::Record(record));
                    ctx.request_repaint();
                }
                Err(e) => log::warn!("dropping malformed event (id {id:?}): {e:#}"),
            }
        }
    }
}

/// React to one transport error: report it, then run the one-shot
/// authorization check. A failed check is logged and otherwise ignored.
fn handle_transport_error(
    client: &Client,
    base: &Url,
    reason: &str,
    tx: &Sender<StreamMessage>,
    ctx: &egui::Context,
) {
    log::warn!("live log transport error: {reason}");
    let _ = tx.send(StreamMessage::Disconnected(reason.to_string()));
    ctx.request_repaint();

    match identity::fetch_is_administrator(client, base) {
        Ok(true) => log::debug!("caller still has administrator access, retrying"),
        Ok(false) => {
            log::warn!("caller lacks the {:?} tag", identity::ADMIN_TAG);
            let _ = tx.send(StreamMessage::AccessDenied);
            ctx.request_repaint();
        }
        Err(e) => log::debug!("authorization check failed: {e:#}"),
    }
}

/// Sleep for the retry delay, waking early if the stream is closed.
fn wait_for_retry(delay: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + delay;
    loop {
        if stop.load(Ordering::Relaxed) {
            return;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return;
        }
        thread::sleep(remaining.min(STOP_POLL_INTERVAL));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_reader(
        input: &[u8],
        last_event_id: &mut Option<String>,
        retry_delay: &mut Duration,
    ) -> Vec<StreamMessage> {
        let (tx, rx) = channel();
        let ctx = egui::Context::default();
        let stop = AtomicBool::new(false);
        read_stream(
            Cursor::new(input),
            &tx,
            &ctx,
            &stop,
            last_event_id,
            retry_delay,
        )
        .expect("in-memory stream never fails");
        rx.try_iter().collect()
    }

    fn records(messages: &[StreamMessage]) -> Vec<&LogRecord> {
        messages
            .iter()
            .filter_map(|m| {
                if let StreamMessage::Record(r) = m {
                    Some(r)
                } else {
                    None
                }
            })
            .collect()
    }

    #[test]
    fn test_records_arrive_in_stream_order() {
        let input = b"id: 1000\ndata: [\"ERROR\",\"auth\",\"login failed\"]\n\n\
                      id: 2000\ndata: [\"INFO\",\"web\",\"request served\"]\n\n\
                      id: 3000\ndata: [\"WARN\",\"db\",\"slow query\"]\n\n";
        let mut id = None;
        let mut retry = DEFAULT_RETRY_DELAY;
        let messages = run_reader(input, &mut id, &mut retry);

        let records = records(&messages);
        assert_eq!(records.len(), 3);
        let sources: Vec<&str> = records.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["auth", "web", "db"]);
        assert_eq!(id.as_deref(), Some("3000"));
    }

    #[test]
    fn test_event_id_is_sticky_across_frames() {
        // Second frame has no id; EventSource keeps the last one
        let input = b"id: 5000\ndata: [\"I\",\"a\",\"one\"]\n\ndata: [\"I\",\"b\",\"two\"]\n\n";
        let mut id = None;
        let mut retry = DEFAULT_RETRY_DELAY;
        let messages = run_reader(input, &mut id, &mut retry);

        let records = records(&messages);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp, records[1].timestamp);
    }

    #[test]
    fn test_malformed_payload_is_dropped_not_fatal() {
        let input = b"id: 1000\ndata: not json\n\nid: 2000\ndata: [\"I\",\"s\",\"fine\"]\n\n";
        let mut id = None;
        let mut retry = DEFAULT_RETRY_DELAY;
        let messages = run_reader(input, &mut id, &mut retry);

        let records = records(&messages);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "fine");
    }

    #[test]
    fn test_named_events_are_not_dispatched() {
        // Only default "message" events become records, but their id and
        // retry fields still apply
        let input = b"event: heartbeat\nid: 9000\ndata: [\"I\",\"s\",\"skipped\"]\n\n\
                      data: [\"I\",\"s\",\"kept\"]\n\n";
        let mut id = None;
        let mut retry = DEFAULT_RETRY_DELAY;
        let messages = run_reader(input, &mut id, &mut retry);

        let records = records(&messages);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "kept");
        assert_eq!(id.as_deref(), Some("9000"));
    }

    #[test]
    fn test_retry_field_updates_delay() {
        let input = b"retry: 5000\ndata: [\"I\",\"s\",\"m\"]\n\nid: 1000\n\n";
        let mut id = None;
        let mut retry = DEFAULT_RETRY_DELAY;
        run_reader(input, &mut id, &mut retry);
        assert_eq!(retry, Duration::from_millis(5000));
    }

    #[test]
    fn test_stop_flag_short_circuits() {
        let (tx, rx) = channel();
        let ctx = egui::Context::default();
        let stop = AtomicBool::new(true);
        let mut id = None;
        let mut retry = DEFAULT_RETRY_DELAY;
        read_stream(
            Cursor::new(b"id: 1\ndata: [\"I\",\"s\",\"m\"]\n\n".as_slice()),
            &tx,
            &ctx,
            &stop,
            &mut id,
            &mut retry,
        )
        .expect("stopped stream returns cleanly");
        assert!(rx.try_iter().next().is_none());
    }
}
