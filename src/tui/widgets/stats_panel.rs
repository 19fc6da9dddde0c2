use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::models::Stats;
use crate::tui::widgets::color::parse_color;

/// One-line summary of the aggregate counters above the task list.
pub fn render_stats_panel(f: &mut Frame, area: Rect, stats: Option<&Stats>, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let content = match stats {
        Some(stats) => summarize(stats),
        None => String::new(),
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(paragraph, area);
}

fn summarize(stats: &Stats) -> String {
    format!(
        "{} tasks \u{2022} {} pending, {} ongoing, {} completed \u{2022} {} overdue \u{2022} {:.0}% done \u{2022} avg difficulty {:.1}",
        stats.total_tasks,
        stats.pending,
        stats.ongoing,
        stats.completed,
        stats.overdue,
        stats.completion_rate,
        stats.average_difficulty
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let stats = Stats {
            total_tasks: 8,
            pending: 3,
            ongoing: 2,
            completed: 3,
            overdue: 1,
            completion_rate: 37.0,
            average_difficulty: 3.4,
        };
        assert_eq!(
            summarize(&stats),
            "8 tasks \u{2022} 3 pending, 2 ongoing, 3 completed \u{2022} 1 overdue \u{2022} 37% done \u{2022} avg difficulty 3.4"
        );
    }
}
