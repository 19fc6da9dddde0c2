use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::tui::app::{TaskFormField, TaskFormState};
use crate::tui::widgets::color::{parse_color, status_color};

const DIFFICULTY_LABELS: [&str; 5] = ["Very Easy", "Easy", "Moderate", "Hard", "Very Hard"];

pub fn render_task_form(f: &mut Frame, area: Rect, form: &TaskFormState, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let base = Style::default().fg(fg_color).bg(bg_color);
    let focused_border = Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Difficulty
            Constraint::Length(3), // Status
            Constraint::Length(3), // Due
            Constraint::Length(1), // Hint
            Constraint::Min(0),
        ])
        .split(area);

    let field_block = |title: &str, focused: bool| {
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        if focused {
            block.border_style(focused_border)
        } else {
            block.style(base)
        }
    };

    // Name
    let name_focused = form.focused == TaskFormField::Name;
    let name = Paragraph::new(form.name.value().to_string())
        .style(base)
        .block(field_block("Task Name", name_focused));
    f.render_widget(name, rows[0]);
    if name_focused {
        f.set_cursor_position(Position::new(
            rows[0].x + 1 + form.name.cursor() as u16,
            rows[0].y + 1,
        ));
    }

    // Difficulty selector, 1 to 5
    let label = DIFFICULTY_LABELS[(form.difficulty as usize - 1).min(4)];
    let difficulty_line = Line::from(vec![
        Span::styled("\u{2190} ", base),
        Span::styled(
            format!("{} ({})", form.difficulty, label),
            Style::default()
                .fg(crate::tui::widgets::color::difficulty_color(form.difficulty))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" \u{2192}", base),
    ]);
    let difficulty = Paragraph::new(difficulty_line).style(base).block(field_block(
        "Difficulty (1-5)",
        form.focused == TaskFormField::Difficulty,
    ));
    f.render_widget(difficulty, rows[1]);

    // Status selector
    let status_line = Line::from(vec![
        Span::styled("\u{2190} ", base),
        Span::styled(
            form.status.as_str(),
            Style::default()
                .fg(status_color(form.status))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" \u{2192}", base),
    ]);
    let status = Paragraph::new(status_line)
        .style(base)
        .block(field_block("Status", form.focused == TaskFormField::Status));
    f.render_widget(status, rows[2]);

    // Due date
    let due_focused = form.focused == TaskFormField::Due;
    let due = Paragraph::new(form.due.value().to_string()).style(base).block(field_block(
        "Due (YYYY-MM-DD [HH:MM], empty = one week from now)",
        due_focused,
    ));
    f.render_widget(due, rows[3]);
    if due_focused {
        f.set_cursor_position(Position::new(
            rows[3].x + 1 + form.due.cursor() as u16,
            rows[3].y + 1,
        ));
    }

    let hint = if form.submitting {
        "Submitting..."
    } else {
        "Ctrl+s to create the task"
    };
    f.render_widget(Paragraph::new(hint).style(base), rows[4]);
}
