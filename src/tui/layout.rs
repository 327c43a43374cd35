//! Layout definitions for the TUI
//!
//! Tab bar on top, the active view in the middle, status bar at the bottom.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout regions for the TUI
pub struct AppLayout {
    pub tabs: Rect,
    pub main: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(3),    // Main area
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        Self {
            tabs: vertical[0],
            main: vertical[1],
            status_bar: vertical[2],
        }
    }
}

/// Header strip above a table or text body
pub struct MainPanelLayout {
    pub header: Rect,
    pub content: Rect,
}

impl MainPanelLayout {
    pub fn new(area: Rect, header_height: u16) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header_height), Constraint::Min(3)])
            .split(area);

        Self {
            header: chunks[0],
            content: chunks[1],
        }
    }
}

/// Create a centered rect for overlays
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_regions() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.tabs.height, 3);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.main.height, 36);
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 50, outer);
        assert!(inner.x >= 20 && inner.right() <= 80);
        assert!(inner.y >= 12 && inner.bottom() <= 38);
    }
}
