use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::Config;
use crate::plan::{bucket_sessions, format_hours, session_time_label};
use crate::tui::app::{PlanFocus, PlanViewState};
use crate::tui::widgets::color::{difficulty_color, parse_color};
use crate::utils::format_day_heading;

pub fn render_plan_view(
    f: &mut Frame,
    area: Rect,
    state: &mut PlanViewState,
    config: &Config,
    today: NaiveDate,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = crate::tui::widgets::color::get_contrast_text_color(highlight_bg);

    let base = Style::default().fg(fg_color).bg(bg_color);
    let focused_border = Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Parameter inputs
            Constraint::Length(1), // Summary line
            Constraint::Min(1),    // Sessions and calendar
        ])
        .split(area);

    // Generation parameters side by side.
    let inputs = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let hours_focused = state.focus == PlanFocus::Hours;
    let hours_block = Block::default().borders(Borders::ALL).title("Hours/day");
    let hours = Paragraph::new(state.hours.value().to_string()).style(base).block(
        if hours_focused {
            hours_block.border_style(focused_border)
        } else {
            hours_block.style(base)
        },
    );
    f.render_widget(hours, inputs[0]);
    if hours_focused {
        f.set_cursor_position(Position::new(
            inputs[0].x + 1 + state.hours.cursor() as u16,
            inputs[0].y + 1,
        ));
    }

    let duration_focused = state.focus == PlanFocus::Duration;
    let duration_block = Block::default().borders(Borders::ALL).title("Session length (h)");
    let duration = Paragraph::new(state.duration.value().to_string())
        .style(base)
        .block(if duration_focused {
            duration_block.border_style(focused_border)
        } else {
            duration_block.style(base)
        });
    f.render_widget(duration, inputs[1]);
    if duration_focused {
        f.set_cursor_position(Position::new(
            inputs[1].x + 1 + state.duration.cursor() as u16,
            inputs[1].y + 1,
        ));
    }

    let summary = match (&state.plan, state.generating) {
        (_, true) => "Generating study plan...".to_string(),
        (Some(plan), false) => {
            let mut line = format!(
                "{} tasks, {}h total",
                plan.total_tasks,
                format_hours(plan.total_study_hours)
            );
            if let Some(reason) = &plan.adjustment_reason {
                line.push_str(" \u{2022} ");
                line.push_str(reason);
            }
            line
        }
        (None, false) => "No plan yet. Press g (or Enter in the inputs) to generate one.".to_string(),
    };
    f.render_widget(Paragraph::new(summary).style(base), rows[1]);

    let Some(plan) = state.plan.clone() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[2]);

    // Left: flat, selectable session list.
    let items: Vec<ListItem> = plan
        .schedule
        .iter()
        .map(|session| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[D{}] ", session.difficulty),
                    Style::default().fg(difficulty_color(session.difficulty)),
                ),
                Span::styled(session.task_name.clone(), base),
                Span::styled(
                    format!("  {}", session_time_label(session)),
                    Style::default().fg(ratatui::style::Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let sessions_focused = state.focus == PlanFocus::Sessions;
    let sessions_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Sessions ({})", plan.schedule.len()));
    let list = List::new(items)
        .block(if sessions_focused {
            sessions_block.border_style(focused_border)
        } else {
            sessions_block.style(base)
        })
        .style(base)
        .highlight_style(
            Style::default()
                .fg(highlight_fg)
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, columns[0], &mut state.session_state);

    // Right: the day-by-day calendar.
    let buckets = bucket_sessions(&plan, today);
    let mut lines: Vec<Line> = Vec::new();
    for day in &buckets.days {
        lines.push(Line::from(Span::styled(
            format_day_heading(day.date),
            Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
        )));
        if day.sessions.is_empty() {
            lines.push(Line::from(Span::styled(
                "  \u{2014}",
                Style::default().fg(ratatui::style::Color::DarkGray),
            )));
        }
        for session in &day.sessions {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", session.task_name), base),
                Span::styled(
                    format!("  {}", session_time_label(session)),
                    Style::default().fg(ratatui::style::Color::DarkGray),
                ),
            ]));
        }
    }
    if !buckets.unscheduled.is_empty() {
        lines.push(Line::from(Span::styled(
            "[Unscheduled]",
            Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
        )));
        for session in &buckets.unscheduled {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", session.task_name), base),
                Span::styled(
                    format!("  {}", session_time_label(session)),
                    Style::default().fg(ratatui::style::Color::DarkGray),
                ),
            ]));
        }
    }
    let calendar = Paragraph::new(lines)
        .style(base)
        .block(Block::default().borders(Borders::ALL).title("Calendar").style(base));
    f.render_widget(calendar, columns[1]);
}
