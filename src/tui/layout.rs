use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub tabs_area: Rect,
    pub banner_area: Rect,
    pub main_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum terminal dimensions required for the application.
    /// Width: 40 columns fits the task list columns and the plan grid.
    /// Height: 12 lines (2 outer borders + 1 tabs + content + 1 status).
    pub const MIN_WIDTH: u16 = 40;
    pub const MIN_HEIGHT: u16 = 12;

    /// `show_banner` reserves a line under the tabs for the connection
    /// error banner; when the backend is reachable the content area gets
    /// the line back.
    pub fn calculate(size: Rect, show_banner: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH);
        let height = size.height.max(Self::MIN_HEIGHT);
        let size = Rect::new(size.x, size.y, width, height);

        // Inner area accounts for the outer border, 1 char on each side
        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        let banner_height = if show_banner { 1 } else { 0 };
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),             // Tabs
                Constraint::Length(banner_height), // Connection banner
                Constraint::Min(1),                // Content
                Constraint::Length(1),             // Status
            ])
            .split(inner_area);

        Self {
            inner_area,
            tabs_area: vertical[0],
            banner_area: vertical[1],
            main_area: vertical[2],
            status_area: vertical[3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_line_only_reserved_when_shown() {
        let size = Rect::new(0, 0, 80, 24);
        let with = Layout::calculate(size, true);
        let without = Layout::calculate(size, false);
        assert_eq!(with.banner_area.height, 1);
        assert_eq!(without.banner_area.height, 0);
        assert_eq!(without.main_area.height, with.main_area.height + 1);
    }

    #[test]
    fn test_small_terminal_is_clamped_to_minimum() {
        let layout = Layout::calculate(Rect::new(0, 0, 10, 5), false);
        assert!(layout.main_area.height >= 1);
        assert!(layout.main_area.width >= Layout::MIN_WIDTH - 2);
    }
}
