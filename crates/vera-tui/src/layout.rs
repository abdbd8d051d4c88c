// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// The regions that make up the TUI layout.
#[derive(Debug, Clone, Copy)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub session_drawer: Rect,
    pub chat_pane: Rect,
    pub input_pane: Rect,
}

const DRAWER_WIDTH: u16 = 24;

impl AppLayout {
    /// Calculate layout regions from a `Rect` (terminal area).
    pub fn compute(area: Rect, drawer_open: bool) -> Self {
        let status_height = 1u16;
        let input_height = 5u16;
        let drawer_width = if drawer_open { DRAWER_WIDTH } else { 0u16 };

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(status_height),
                Constraint::Min(10),
                Constraint::Length(input_height),
            ])
            .split(area);

        let horizontal = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(drawer_width), Constraint::Min(20)])
            .split(vertical[1]);

        AppLayout {
            status_bar: vertical[0],
            session_drawer: horizontal[0],
            chat_pane: horizontal[1],
            input_pane: vertical[2],
        }
    }

    /// Convenience wrapper — derive the area from the current frame.
    pub fn new(frame: &Frame, drawer_open: bool) -> Self {
        Self::compute(frame.area(), drawer_open)
    }

    /// The number of text rows visible inside the chat pane's border.
    /// (pane height minus the two border rows)
    pub fn chat_inner_height(&self) -> u16 {
        self.chat_pane.height.saturating_sub(2)
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawer_closed_gives_the_chat_the_full_width() {
        let l = AppLayout::compute(Rect::new(0, 0, 100, 40), false);
        assert_eq!(l.session_drawer.width, 0);
        assert_eq!(l.chat_pane.width, 100);
    }

    #[test]
    fn drawer_open_reserves_its_column() {
        let l = AppLayout::compute(Rect::new(0, 0, 100, 40), true);
        assert_eq!(l.session_drawer.width, DRAWER_WIDTH);
        assert_eq!(l.chat_pane.width, 100 - DRAWER_WIDTH);
    }

    #[test]
    fn vertical_stack_is_status_chat_input() {
        let l = AppLayout::compute(Rect::new(0, 0, 80, 30), false);
        assert_eq!(l.status_bar.height, 1);
        assert_eq!(l.input_pane.height, 5);
        assert_eq!(l.chat_pane.height, 30 - 1 - 5);
        assert_eq!(l.chat_inner_height(), l.chat_pane.height - 2);
    }
}
