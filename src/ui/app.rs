use super::log_table::LogTable;
use super::session_state::{ConnectionState, SessionState, StreamEffect};
use super::toasts::ToastManager;
use super::windows;

use std::sync::mpsc::Receiver;

use crate::config::{GlobalConfig, DEFAULT_SERVER_URL};
use crate::core::{LiveLogStream, StreamMessage};
use egui::Color32;
use reqwest::Url;

/// Fixed text of the access-denied notice
const ACCESS_DENIED_TEXT: &str = "Access denied, administrator access required";

/// Main application state
pub struct LiveCrabApp {
    /// Everything the stream thread mutates through messages
    session: SessionState,

    /// Handle keeping the stream thread alive; dropping it closes the
    /// connection
    stream: LiveLogStream,

    /// Messages from the stream thread
    stream_rx: Receiver<StreamMessage>,

    /// Server this session follows
    server_url: Url,

    /// Toast notifications for connection events
    toasts: ToastManager,

    /// Global configuration (server, timestamp format)
    config: GlobalConfig,

    /// Whether to show the About window
    show_about_window: bool,
}

impl LiveCrabApp {
    pub fn new(cc: &eframe::CreationContext<'_>, server: Option<String>) -> Self {
        let mut config = GlobalConfig::load();

        let requested = server.or_else(|| config.server_url.clone());
        let server_url = resolve_server_url(requested.as_deref());

        // Remember the server for the next session
        if config.server_url.as_deref() != Some(server_url.as_str()) {
            config.server_url = Some(server_url.to_string());
            if let Err(e) = config.save() {
                log::warn!("Could not save config: {e}");
            }
        }

        let (stream, stream_rx) = LiveLogStream::connect(server_url.clone(), cc.egui_ctx.clone());

        LiveCrabApp {
            session: SessionState::new(),
            stream,
            stream_rx,
            server_url,
            toasts: ToastManager::new(),
            config,
            show_about_window: false,
        }
    }

    /// Drain all pending stream messages. Returns whether any row was
    /// appended this frame.
    fn process_stream_messages(&mut self) -> bool {
        let mut appended = false;
        while let Ok(message) = self.stream_rx.try_recv() {
            match self.session.apply(message) {
                StreamEffect::Appended => appended = true,
                StreamEffect::Lost(reason) => {
                    self.toasts
                        .show_error(format!("Log stream interrupted: {reason}"));
                }
                StreamEffect::None => {}
            }
        }
        appended
    }

    fn update_window_title(&self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "LiveCrab - {}",
            self.server_url
        )));
    }

    /// Render top menu bar
    fn render_menu_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.menu_button("File", |ui| {
            if ui.button("Quit").clicked() {
                self.stream.close();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("Help", |ui| {
            if ui.button("About").clicked() {
                self.show_about_window = true;
                ui.close();
            }
        });
    }

    /// Render bottom status panel
    fn render_status_panel(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(self.session.status_line());
            ui.separator();
            ui.label(format!("Server: {}", self.server_url));

            if self.session.connection == ConnectionState::Retrying {
                ui.separator();
                ui.spinner();
            }
        });
    }

    /// Render the persistent access-denied notice. Same text and
    /// visibility every frame; repeated denials change nothing.
    fn render_access_denied_banner(ctx: &egui::Context) {
        egui::TopBottomPanel::top("access_denied_banner")
            .frame(
                egui::Frame::default()
                    .fill(Color32::from_rgb(80, 20, 20))
                    .inner_margin(egui::Margin::same(8)),
            )
            .show(ctx, |ui| {
                ui.colored_label(Color32::from_rgb(255, 100, 100), ACCESS_DENIED_TEXT);
            });
    }
}

impl eframe::App for LiveCrabApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let appended = self.process_stream_messages();

        self.update_window_title(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                self.render_menu_bar(ui, ctx);
            });
        });

        if self.session.access_denied {
            Self::render_access_denied_banner(ctx);
        }

        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            self.render_status_panel(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.store.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(100.0);
                    ui.heading("Welcome to LiveCrab 🦀");
                    ui.add_space(20.0);
                    ui.label("Waiting for records from the live log stream...");
                    ui.add_space(10.0);
                    ui.spinner();
                });
            } else {
                // Record arrival reads the auto-scroll state; only scroll
                // input inside LogTable::render writes it
                let scroll_to_bottom = appended && self.session.autoscroll.is_pinned();
                LogTable::render(
                    ui,
                    self.session.store.records(),
                    &self.config.timestamp_format,
                    scroll_to_bottom,
                    &mut self.session.autoscroll,
                );
            }
        });

        if self.show_about_window {
            windows::render_about_window(ctx, &mut self.show_about_window);
        }

        self.toasts.show(ctx);
    }
}

/// Parse the requested server URL, falling back to the default. A missing
/// trailing slash would make `Url::join` drop the last path segment.
fn resolve_server_url(requested: Option<&str>) -> Url {
    if let Some(raw) = requested {
        let raw = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        match Url::parse(&raw) {
            Ok(url) => return url,
            Err(e) => log::error!(
                "Invalid server URL {raw:?} ({e}), falling back to {DEFAULT_SERVER_URL}"
            ),
        }
    }
    Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_server_url_appends_slash() {
        let url = resolve_server_url(Some("http://logs.example.net:9000"));
        assert_eq!(url.as_str(), "http://logs.example.net:9000/");
    }

    #[test]
    fn test_resolve_server_url_falls_back_on_garbage() {
        let url = resolve_server_url(Some("not a url"));
        assert_eq!(url.as_str(), DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_resolve_server_url_default() {
        let url = resolve_server_url(None);
        assert_eq!(url.as_str(), DEFAULT_SERVER_URL);
    }
}
