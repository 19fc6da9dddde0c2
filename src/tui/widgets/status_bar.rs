use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

/// One-line status bar: a transient message when there is one, otherwise
/// the key hints for the active tab. Hints that do not fit are dropped
/// and replaced with an ellipsis.
pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let max_width = area.width as usize;
    let (content, style) = if let Some(msg) = message {
        let msg_fg = get_contrast_text_color(highlight_bg);
        (
            truncate_with_ellipsis(msg, max_width),
            Style::default()
                .fg(msg_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            fit_hints(key_hints, max_width),
            Style::default().fg(fg_color).bg(bg_color),
        )
    };

    let paragraph = Paragraph::new(content).style(style);
    f.render_widget(paragraph, area);
}

fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    let separator = " \u{2022} ";
    let separator_len = separator.chars().count();

    let mut text = String::new();
    for (i, hint) in key_hints.iter().enumerate() {
        let hint_len = hint.chars().count();
        let current_len = text.chars().count();
        let would_be_len = if i == 0 {
            hint_len
        } else {
            current_len + separator_len + hint_len
        };
        if would_be_len > max_width {
            if text.is_empty() {
                return truncate_with_ellipsis(hint, max_width);
            }
            if current_len + 3 <= max_width {
                text.push_str("...");
            }
            break;
        }
        if i > 0 {
            text.push_str(separator);
        }
        text.push_str(hint);
    }
    text
}

fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_width.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_that_fit_are_joined_with_bullets() {
        let hints = vec!["q quit".to_string(), "r refresh".to_string()];
        assert_eq!(fit_hints(&hints, 40), "q quit \u{2022} r refresh");
    }

    #[test]
    fn test_overflowing_hints_are_dropped_with_ellipsis() {
        let hints = vec![
            "q quit".to_string(),
            "r refresh".to_string(),
            "d delete".to_string(),
        ];
        let fitted = fit_hints(&hints, 22);
        assert_eq!(fitted, "q quit \u{2022} r refresh...");
    }

    #[test]
    fn test_long_message_is_truncated() {
        assert_eq!(truncate_with_ellipsis("Failed to load tasks", 10), "Failed ...");
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
    }
}
