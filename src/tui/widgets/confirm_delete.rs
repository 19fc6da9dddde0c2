use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::app::DeleteConfirmation;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_confirm_delete(
    f: &mut Frame,
    area: Rect,
    confirmation: &DeleteConfirmation,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup = popup_area(area, 50, 30);

    // Clear first so the content underneath does not show through.
    f.render_widget(Clear, popup);

    let base = Style::default().fg(fg_color).bg(bg_color);
    let selected = Style::default().fg(highlight_fg).bg(highlight_bg);

    let options = ["Delete", "Cancel"];
    let mut option_spans: Vec<Span> = Vec::new();
    for (index, option) in options.iter().enumerate() {
        if index > 0 {
            option_spans.push(Span::styled("    ", base));
        }
        let style = if index == confirmation.selection {
            selected
        } else {
            base
        };
        option_spans.push(Span::styled(format!(" {} ", option), style));
    }

    let lines = vec![
        Line::from(Span::styled("Delete this task?", base)),
        Line::from(""),
        Line::from(Span::styled(confirmation.task_name.clone(), base)),
        Line::from(""),
        Line::from(option_spans),
        Line::from(""),
        Line::from(Span::styled(
            "\u{2190}\u{2192} to choose, Enter to confirm, Esc to cancel",
            base,
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .title_alignment(Alignment::Center)
                .style(base),
        )
        .style(base)
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup);
}

/// Centered rect taking a percentage of the available area.
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
