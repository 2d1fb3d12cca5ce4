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

//! Decides whether the viewport follows newly arriving records.
//!
//! Two states: pinned (the table tracks the newest row) and free (the user
//! has taken over). Scroll input drives all transitions; record arrival only
//! reads the current state and never writes it. Kept free of egui types so
//! the transition rule is testable on its own.

/// Scrolling further than this from the bottom edge still counts as
/// "at the bottom" when deciding to re-pin.
pub const NEAR_BOTTOM_TOLERANCE: f32 = 3.0;

/// Geometry of the scrollable viewport at the time of a scroll event.
#[derive(Debug, Clone, Copy)]
pub struct ScrollMetrics {
    /// Current scroll offset from the top.
    pub offset: f32,
    /// Total height of the scrollable content.
    pub content_height: f32,
    /// Height of the visible viewport.
    pub viewport_height: f32,
}

impl ScrollMetrics {
    /// Distance between the bottom of the viewport and the bottom of the
    /// content for this event.
    #[must_use]
    pub fn distance_from_bottom(&self) -> f32 {
        (self.content_height - self.viewport_height - self.offset).abs()
    }
}

/// Auto-scroll state for one viewing session. Starts pinned.
#[derive(Debug, Clone, Copy)]
pub struct AutoScroll {
    pinned: bool,
    last_offset: f32,
}

impl Default for AutoScroll {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoScroll {
    #[must_use]
    pub const fn new() -> Self {
        AutoScroll {
            pinned: true,
            last_offset: 0.0,
        }
    }

    /// Whether new rows should currently be scrolled into view.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Feed one scroll event into the state machine.
    ///
    /// Downward movement while free re-pins only within
    /// [`NEAR_BOTTOM_TOLERANCE`] of the bottom. Upward movement always
    /// unpins. An unchanged offset is a no-op, and downward movement while
    /// already pinned performs no nearness re-check; pinning is only ever
    /// revoked by an upward scroll.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        let offset = metrics.offset;
        if offset > self.last_offset && !self.pinned {
            self.pinned = metrics.distance_from_bottom() < NEAR_BOTTOM_TOLERANCE;
        } else if offset < self.last_offset {
            self.pinned = false;
        }
        self.last_offset = offset.max(0.0);
    }
}
