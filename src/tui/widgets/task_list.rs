use chrono::NaiveDateTime;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState,
};

use crate::Config;
use crate::models::Task;
use crate::tui::widgets::color::{
    difficulty_color, get_contrast_text_color, parse_color, status_color,
};
use crate::utils::format_due_distance;

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    loading: bool,
    list_state: &mut ListState,
    config: &Config,
    now: NaiveDateTime,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let base = Style::default().fg(fg_color).bg(bg_color);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Tasks ({})", tasks.len()))
        .style(base);

    if loading && tasks.is_empty() {
        let placeholder = Paragraph::new("Loading tasks...").block(block).style(base);
        f.render_widget(placeholder, area);
        return;
    }

    if tasks.is_empty() {
        let placeholder = Paragraph::new("No tasks yet. Create one to get started!")
            .block(block)
            .style(base);
        f.render_widget(placeholder, area);
        return;
    }

    // 2 for borders, 2 for padding
    let max_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| ListItem::new(task_line(task, max_width, fg_color, now)))
        .collect();

    let list = List::new(items)
        .block(block)
        .style(base)
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, list_state);

    // Scrollbar only when the list overflows the viewport
    let visible_rows = area.height.saturating_sub(2) as usize;
    if tasks.len() > visible_rows {
        let mut scrollbar_state =
            ScrollbarState::new(tasks.len()).position(list_state.selected().unwrap_or(0));
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn task_line(
    task: &Task,
    max_width: usize,
    fg_color: ratatui::style::Color,
    now: NaiveDateTime,
) -> Line<'static> {
    let badge = format!("[D{}]", task.scale_difficulty);
    let status = task.priority.as_str();
    let due = format_due_distance(now, &task.timedue);

    // Name gets whatever is left after the fixed-width trailing columns.
    let trailing_len = badge.chars().count() + status.chars().count() + due.chars().count() + 6;
    let name_width = max_width.saturating_sub(trailing_len).max(8);
    let mut name = task.task_name.clone();
    if name.chars().count() > name_width {
        name = name.chars().take(name_width.saturating_sub(3)).collect::<String>() + "...";
    }

    Line::from(vec![
        Span::styled(name, Style::default().fg(fg_color)),
        Span::raw("  "),
        Span::styled(due, Style::default().fg(ratatui::style::Color::DarkGray)),
        Span::raw("  "),
        Span::styled(badge, Style::default().fg(difficulty_color(task.scale_difficulty))),
        Span::raw("  "),
        Span::styled(
            status.to_string(),
            Style::default().fg(status_color(task.priority)),
        ),
    ])
}
