use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout as RatLayout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{ConnectionStatus, Mode, Tab};
use crate::tui::{App, Layout};
use crate::tui::widgets::{
    color::parse_color,
    confirm_delete::render_confirm_delete,
    help::render_help,
    plan_view::render_plan_view,
    stats_panel::render_stats_panel,
    status_bar::render_status_bar,
    tabs::render_tabs,
    task_form::render_task_form,
    task_list::render_task_list,
};
use crate::utils::now_utc;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    // Outer border with the app title centered in the top edge.
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("STUDYDESK")
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.active_tab, &app.config);

    if app.connection == ConnectionStatus::Error && layout.banner_area.height > 0 {
        let banner = Paragraph::new(
            "Cannot connect to backend. Is the server running? Press r to retry.",
        )
        .style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(banner, layout.banner_area);
    }

    let now = now_utc();
    match app.active_tab {
        Tab::Tasks => {
            // Stats line above the list when stats have arrived.
            let rows = RatLayout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(layout.main_area);
            render_stats_panel(f, rows[0], app.stats.as_ref(), &app.config);
            render_task_list(
                f,
                rows[1],
                &app.tasks,
                app.tasks_loading,
                &mut app.task_list_state,
                &app.config,
                now.naive_local(),
            );
        }
        Tab::Create => {
            render_task_form(f, layout.main_area, &app.form, &app.config);
        }
        Tab::Plan => {
            let config = app.config.clone();
            render_plan_view(
                f,
                layout.main_area,
                &mut app.plan,
                &config,
                now.date_naive(),
            );
        }
    }

    let key_hints = key_hints_for(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_ref(),
        &key_hints,
        &app.config,
    );

    if app.mode == Mode::Help {
        render_help(f, layout.inner_area, &app.config);
    }
    if let Some(confirmation) = &app.delete_confirmation {
        render_confirm_delete(f, layout.inner_area, confirmation, &app.config);
    }
}

fn key_hints_for(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;
    match app.active_tab {
        Tab::Tasks => vec![
            format!("{} quit", kb.quit),
            format!("{} refresh", kb.refresh),
            format!("{} status", kb.cycle_status),
            format!("{} delete", kb.delete),
            format!("{}/{} move", kb.list_up, kb.list_down),
            format!("{} help", kb.help),
        ],
        Tab::Create => vec![
            "Tab next field".to_string(),
            format!("{} create", kb.submit),
            "Esc back".to_string(),
            format!("{} help", kb.help),
        ],
        Tab::Plan => vec![
            format!("{} generate", kb.generate),
            format!("{} missed", kb.mark_missed),
            "Tab focus".to_string(),
            format!("{} help", kb.help),
        ],
    }
}
