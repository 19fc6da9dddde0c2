use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::sync::mpsc;

use crate::api::ApiClient;
use crate::tui::app::{Action, App, Mode, PlanFocus, Tab, TaskFormField};
use crate::tui::bridge::ApiBridge;
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{matches_key_event, parse_key_binding};

/// Guard that ensures terminal state is restored even on panic.
/// If the terminal is left in raw mode or the alternate screen, the
/// user's shell is unusable afterwards.
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Manually restore terminal state (called on normal exit).
    /// After calling this, the guard does nothing on drop.
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Ignore errors in drop, this is already a cleanup path
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App, client: ApiClient) -> Result<(), TuiError> {
    // Check terminal size before entering the alternate screen so the
    // error message lands in the normal terminal.
    let (width, height) = terminal_size().map_err(TuiError::IoError)?;
    if width < Layout::MIN_WIDTH || height < Layout::MIN_HEIGHT {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, minimum required: {}x{}. Please resize your terminal window.",
            width,
            height,
            Layout::MIN_WIDTH,
            Layout::MIN_HEIGHT
        )));
    }

    let mut guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let bridge = ApiBridge::new(client, tx);

    // Kick off the health probe and the initial data load together.
    bridge.check_health();
    bridge.load_tasks();
    bridge.load_stats();

    loop {
        app.status.check_timeout();

        // Fold in any backend results that arrived since the last tick.
        let mut quit = false;
        while let Ok(api_event) = rx.try_recv() {
            let action = app.handle_api_event(api_event);
            if perform(&bridge, &mut app, action) {
                quit = true;
            }
        }
        if quit {
            break;
        }

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect, app.connection.is_error());
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(std::time::Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key_event) => {
                    // Only process Press events to avoid double-processing
                    // on Windows, which also reports Release.
                    if key_event.kind == KeyEventKind::Press {
                        let action = handle_key_event(&mut app, key_event)?;
                        if perform(&bridge, &mut app, action) {
                            break;
                        }
                    }
                }
                Event::Resize(_width, _height) => {
                    // Layout is recomputed from terminal.size() on the
                    // next draw; nothing to do here.
                }
                _ => {}
            }
        }
    }

    guard.restore()?;

    Ok(())
}

/// Carry out an [`Action`] against the backend. Returns true when the
/// loop should exit.
fn perform(bridge: &ApiBridge, app: &mut App, action: Action) -> bool {
    match action {
        Action::None => {}
        Action::Quit => return true,
        Action::Refresh => {
            // Manual refresh also re-probes health, so the connection
            // banner clears once the backend is reachable again.
            app.tasks_loading = true;
            bridge.check_health();
            bridge.load_tasks();
            bridge.load_stats();
        }
        Action::CreateTask(task) => bridge.create_task(task),
        Action::UpdateStatus { name, status } => bridge.update_status(name, status),
        Action::DeleteTask(name) => bridge.delete_task(name),
        Action::GeneratePlan { hours, duration } => bridge.generate_plan(hours, duration),
        Action::MarkMissed(name) => bridge.mark_missed(name),
    }
    false
}

/// Route one key press. Modals take priority over everything, then the
/// help overlay, then the active tab.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<Action, TuiError> {
    if app.delete_confirmation.is_some() {
        return handle_delete_confirmation_keys(app, key_event);
    }

    if app.mode == Mode::Help {
        // Any key dismisses the help overlay.
        app.mode = Mode::Normal;
        return Ok(Action::None);
    }

    let bindings = app.config.key_bindings.clone();
    let help = parse_key_binding(&bindings.help).map_err(TuiError::KeyBindingError)?;
    if matches_key_event(key_event, &help) {
        app.mode = Mode::Help;
        return Ok(Action::None);
    }

    let tab_1 = parse_key_binding(&bindings.tab_1).map_err(TuiError::KeyBindingError)?;
    let tab_2 = parse_key_binding(&bindings.tab_2).map_err(TuiError::KeyBindingError)?;
    let tab_3 = parse_key_binding(&bindings.tab_3).map_err(TuiError::KeyBindingError)?;

    // Direct tab keys work everywhere except inside text fields; the form
    // and plan handlers claim printable characters first.
    let typing = app.active_tab == Tab::Create
        || (app.active_tab == Tab::Plan && app.plan.focus != PlanFocus::Sessions);
    if !typing {
        if matches_key_event(key_event, &tab_1) {
            app.active_tab = Tab::Tasks;
            return Ok(Action::None);
        }
        if matches_key_event(key_event, &tab_2) {
            app.active_tab = Tab::Create;
            return Ok(Action::None);
        }
        if matches_key_event(key_event, &tab_3) {
            app.active_tab = Tab::Plan;
            return Ok(Action::None);
        }
    }

    match app.active_tab {
        Tab::Tasks => handle_tasks_tab_keys(app, key_event),
        Tab::Create => handle_create_tab_keys(app, key_event),
        Tab::Plan => handle_plan_tab_keys(app, key_event),
    }
}

fn handle_delete_confirmation_keys(app: &mut App, key_event: KeyEvent) -> Result<Action, TuiError> {
    match key_event.code {
        KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            app.toggle_delete_selection();
            Ok(Action::None)
        }
        KeyCode::Enter => Ok(app.confirm_delete_selection()),
        KeyCode::Esc => {
            app.cancel_delete();
            Ok(Action::None)
        }
        _ => Ok(Action::None),
    }
}

fn handle_tasks_tab_keys(app: &mut App, key_event: KeyEvent) -> Result<Action, TuiError> {
    let bindings = app.config.key_bindings.clone();
    let quit = parse_key_binding(&bindings.quit).map_err(TuiError::KeyBindingError)?;
    let refresh = parse_key_binding(&bindings.refresh).map_err(TuiError::KeyBindingError)?;
    let delete = parse_key_binding(&bindings.delete).map_err(TuiError::KeyBindingError)?;
    let cycle = parse_key_binding(&bindings.cycle_status).map_err(TuiError::KeyBindingError)?;
    let list_up = parse_key_binding(&bindings.list_up).map_err(TuiError::KeyBindingError)?;
    let list_down = parse_key_binding(&bindings.list_down).map_err(TuiError::KeyBindingError)?;
    let tab_left = parse_key_binding(&bindings.tab_left).map_err(TuiError::KeyBindingError)?;
    let tab_right = parse_key_binding(&bindings.tab_right).map_err(TuiError::KeyBindingError)?;

    if matches_key_event(key_event, &quit) {
        return Ok(Action::Quit);
    }
    if matches_key_event(key_event, &refresh) {
        return Ok(Action::Refresh);
    }
    if matches_key_event(key_event, &delete) {
        app.request_delete_selected();
        return Ok(Action::None);
    }
    if matches_key_event(key_event, &cycle) {
        return Ok(app.cycle_selected_status());
    }
    if matches_key_event(key_event, &list_up) || key_event.code == KeyCode::Up {
        app.select_previous_task();
        return Ok(Action::None);
    }
    if matches_key_event(key_event, &list_down) || key_event.code == KeyCode::Down {
        app.select_next_task();
        return Ok(Action::None);
    }
    if matches_key_event(key_event, &tab_left) {
        app.active_tab = app.active_tab.previous();
        return Ok(Action::None);
    }
    if matches_key_event(key_event, &tab_right) {
        app.active_tab = app.active_tab.next();
        return Ok(Action::None);
    }
    Ok(Action::None)
}

fn handle_create_tab_keys(app: &mut App, key_event: KeyEvent) -> Result<Action, TuiError> {
    let bindings = app.config.key_bindings.clone();
    let submit = parse_key_binding(&bindings.submit).map_err(TuiError::KeyBindingError)?;
    if matches_key_event(key_event, &submit) {
        return Ok(app.submit_task_form(crate::utils::now_utc()));
    }

    match key_event.code {
        KeyCode::Esc => {
            app.active_tab = Tab::Tasks;
            return Ok(Action::None);
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form.focused = app.form.focused.next();
            return Ok(Action::None);
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form.focused = app.form.focused.previous();
            return Ok(Action::None);
        }
        _ => {}
    }

    match app.form.focused {
        TaskFormField::Name => handle_text_field_key(&mut app.form.name, key_event),
        TaskFormField::Due => handle_text_field_key(&mut app.form.due, key_event),
        TaskFormField::Difficulty => match key_event.code {
            KeyCode::Left => app.adjust_form_difficulty(-1),
            KeyCode::Right => app.adjust_form_difficulty(1),
            KeyCode::Char(c @ '1'..='5') => {
                app.form.difficulty = c as u8 - b'0';
            }
            _ => {}
        },
        TaskFormField::Status => {
            if matches!(key_event.code, KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')) {
                app.cycle_form_status();
            }
        }
    }
    Ok(Action::None)
}

fn handle_plan_tab_keys(app: &mut App, key_event: KeyEvent) -> Result<Action, TuiError> {
    if app.plan.focus == PlanFocus::Sessions {
        let bindings = app.config.key_bindings.clone();
        let quit = parse_key_binding(&bindings.quit).map_err(TuiError::KeyBindingError)?;
        let generate = parse_key_binding(&bindings.generate).map_err(TuiError::KeyBindingError)?;
        let missed = parse_key_binding(&bindings.mark_missed).map_err(TuiError::KeyBindingError)?;
        let list_up = parse_key_binding(&bindings.list_up).map_err(TuiError::KeyBindingError)?;
        let list_down = parse_key_binding(&bindings.list_down).map_err(TuiError::KeyBindingError)?;
        let tab_left = parse_key_binding(&bindings.tab_left).map_err(TuiError::KeyBindingError)?;
        let tab_right = parse_key_binding(&bindings.tab_right).map_err(TuiError::KeyBindingError)?;

        if matches_key_event(key_event, &quit) {
            return Ok(Action::Quit);
        }
        if matches_key_event(key_event, &generate) {
            return Ok(app.submit_plan_form());
        }
        if matches_key_event(key_event, &missed) {
            return Ok(app.mark_selected_session_missed());
        }
        if matches_key_event(key_event, &list_up) || key_event.code == KeyCode::Up {
            app.select_previous_session();
            return Ok(Action::None);
        }
        if matches_key_event(key_event, &list_down) || key_event.code == KeyCode::Down {
            app.select_next_session();
            return Ok(Action::None);
        }
        if matches_key_event(key_event, &tab_left) {
            app.active_tab = app.active_tab.previous();
            return Ok(Action::None);
        }
        if matches_key_event(key_event, &tab_right) {
            app.active_tab = app.active_tab.next();
            return Ok(Action::None);
        }
        if key_event.code == KeyCode::Tab {
            app.plan.focus = app.plan.focus.next();
        }
        return Ok(Action::None);
    }

    // Hours or Duration text field has focus.
    match key_event.code {
        KeyCode::Enter => return Ok(app.submit_plan_form()),
        KeyCode::Esc => {
            app.active_tab = Tab::Tasks;
            return Ok(Action::None);
        }
        KeyCode::Tab | KeyCode::Down => {
            app.plan.focus = app.plan.focus.next();
            return Ok(Action::None);
        }
        _ => {}
    }
    let field = match app.plan.focus {
        PlanFocus::Hours => &mut app.plan.hours,
        PlanFocus::Duration => &mut app.plan.duration,
        PlanFocus::Sessions => unreachable!(),
    };
    handle_text_field_key(field, key_event);
    Ok(Action::None)
}

fn handle_text_field_key(field: &mut crate::tui::widgets::input::InputField, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Char(c) => field.handle_char(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Home => field.move_home(),
        KeyCode::End => field.move_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::tui::bridge::ApiEvent;
    use std::time::Duration;

    // Nothing listens on this port, so every dispatched request settles
    // quickly with a connection error.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    #[test]
    fn test_refresh_redispatches_health_probe() {
        let client = ApiClient::new(UNREACHABLE).unwrap();
        let (tx, rx) = mpsc::channel();
        let bridge = ApiBridge::new(client, tx);
        let mut app = App::new(Config::default());

        assert!(!perform(&bridge, &mut app, Action::Refresh));
        assert!(app.tasks_loading);

        let mut saw_health = false;
        for _ in 0..3 {
            match rx.recv_timeout(Duration::from_secs(30)).unwrap() {
                ApiEvent::Health(result) => {
                    assert!(result.is_err());
                    saw_health = true;
                }
                ApiEvent::TasksLoaded(_) | ApiEvent::StatsLoaded(_) => {}
                other => panic!("unexpected event from refresh: {:?}", other),
            }
        }
        assert!(saw_health);
    }

    #[test]
    fn test_quit_action_stops_the_loop() {
        let client = ApiClient::new(UNREACHABLE).unwrap();
        let (tx, _rx) = mpsc::channel();
        let bridge = ApiBridge::new(client, tx);
        let mut app = App::new(Config::default());

        assert!(perform(&bridge, &mut app, Action::Quit));
        assert!(!perform(&bridge, &mut app, Action::None));
    }
}
