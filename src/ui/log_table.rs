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

use crate::core::autoscroll::{AutoScroll, ScrollMetrics};
use crate::core::record::LogRecord;
use egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

const ROW_HEIGHT: f32 = 18.0;

/// Tint for well-known severity labels; unknown labels use the default text
/// color.
fn severity_color(severity: &str) -> Option<Color32> {
    match severity.to_ascii_uppercase().as_str() {
        "FATAL" | "ERROR" | "ERR" => Some(Color32::from_rgb(255, 100, 100)),
        "WARN" | "WARNING" => Some(Color32::from_rgb(255, 200, 100)),
        "DEBUG" | "TRACE" | "VERBOSE" => Some(Color32::GRAY),
        _ => None,
    }
}

/// The live record table
pub struct LogTable;

impl LogTable {
    /// Render all records as one growing table inside a vertical scroll
    /// area.
    ///
    /// When `scroll_to_bottom` is set (new rows arrived while the viewport
    /// is pinned), the newest row is brought into view bottom-aligned.
    /// Every frame the resulting scroll geometry is fed back into the
    /// auto-scroll state machine.
    pub fn render(
        ui: &mut Ui,
        records: &[LogRecord],
        timestamp_format: &str,
        scroll_to_bottom: bool,
        autoscroll: &mut AutoScroll,
    ) {
        let header_height = ui.text_style_height(&egui::TextStyle::Heading);

        let output = egui::ScrollArea::vertical()
            .id_salt("livelog")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(false)
                    .vscroll(false)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::TOP))
                    .column(Column::initial(150.0).clip(true))
                    .column(Column::initial(70.0).clip(true))
                    .column(Column::initial(110.0).clip(true))
                    .column(Column::remainder().clip(true))
                    .header(header_height, |mut header| {
                        header.col(|ui| {
                            ui.strong("Timestamp");
                        });
                        header.col(|ui| {
                            ui.strong("Severity");
                        });
                        header.col(|ui| {
                            ui.strong("Source");
                        });
                        header.col(|ui| {
                            ui.strong("Message");
                        });
                    })
                    .body(|mut body| {
                        for record in records {
                            let lines = record.message.lines().count().max(1);
                            body.row(ROW_HEIGHT * lines as f32, |mut row| {
                                Self::render_record_row(&mut row, record, timestamp_format);
                            });
                        }
                    });

                if scroll_to_bottom {
                    ui.scroll_to_cursor(Some(egui::Align::Max));
                }
            });

        autoscroll.on_scroll(ScrollMetrics {
            offset: output.state.offset.y,
            content_height: output.content_size.y,
            viewport_height: output.inner_rect.height(),
        });
    }

    fn render_record_row(
        row: &mut egui_extras::TableRow,
        record: &LogRecord,
        timestamp_format: &str,
    ) {
        row.col(|ui| {
            ui.label(record.timestamp.format(timestamp_format).to_string());
        });
        row.col(|ui| {
            let text = RichText::new(&record.severity);
            match severity_color(&record.severity) {
                Some(color) => ui.label(text.color(color)),
                None => ui.label(text),
            };
        });
        row.col(|ui| {
            ui.label(&record.source);
        });
        row.col(|ui| {
            // Monospace keeps the message preformatted; newlines render as-is
            ui.label(RichText::new(&record.message).monospace());
        });
    }
}
