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

//! Transient toast notifications for connection lifecycle events.

use egui::Align2;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};

/// Manages toast notifications for the app
pub struct ToastManager {
    toasts: Toasts,
}

impl ToastManager {
    #[must_use]
    pub fn new() -> Self {
        let toasts = Toasts::new()
            .anchor(Align2::RIGHT_BOTTOM, (-10.0, -40.0))
            .direction(egui::Direction::BottomUp);

        Self { toasts }
    }

    /// Show an error toast (auto-dismisses after timeout)
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.toasts.add(Toast {
            text: message.into().into(),
            kind: ToastKind::Error,
            options: ToastOptions::default()
                .duration_in_seconds(8.0)
                .show_progress(true),
            ..Default::default()
        });
    }

    /// Show a success toast (auto-dismisses after timeout)
    #[allow(dead_code)]
    pub fn show_success(&mut self, message: impl Into<String>) {
        self.toasts.add(Toast {
            text: message.into().into(),
            kind: ToastKind::Success,
            options: ToastOptions::default()
                .duration_in_seconds(3.0)
                .show_progress(true),
            ..Default::default()
        });
    }

    /// Render all toasts - call this in the update loop
    pub fn show(&mut self, ctx: &egui::Context) {
        self.toasts.show(ctx);
    }
}

impl Default for ToastManager {
    fn default() -> Self {
        Self::new()
    }
}
