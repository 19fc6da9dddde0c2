use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::confirm_delete::popup_area;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup = popup_area(area, 60, 70);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, popup);
}

fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!("  {} / {}: Switch tabs\n", kb.tab_left, kb.tab_right));
    text.push_str(&format!(
        "  {} / {} / {}: Jump to Tasks / New Task / Study Plan\n",
        kb.tab_1, kb.tab_2, kb.tab_3
    ));
    text.push_str(&format!("  {} / {}: Move list selection\n", kb.list_up, kb.list_down));
    text.push('\n');

    text.push_str("Tasks:\n");
    text.push_str(&format!("  {}: Refresh from the backend\n", kb.refresh));
    text.push_str(&format!("  {}: Cycle task status\n", kb.cycle_status));
    text.push_str(&format!("  {}: Delete selected task\n", kb.delete));
    text.push('\n');

    text.push_str("New Task:\n");
    text.push_str("  Tab / Shift+Tab: Move between fields\n");
    text.push_str(&format!("  {}: Submit the form\n", kb.submit));
    text.push_str("  Esc: Back to the task list\n");
    text.push('\n');

    text.push_str("Study Plan:\n");
    text.push_str(&format!(
        "  {}: Generate a plan (or Enter in the inputs)\n",
        kb.generate
    ));
    text.push_str(&format!("  {}: Mark selected session missed\n", kb.mark_missed));
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Toggle this help\n", kb.help));
    text.push_str(&format!("  {}: Quit\n", kb.quit));
    text.push_str("\nPress any key to close.");

    text
}
