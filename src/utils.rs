use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use directories::ProjectDirs;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

/// Get the configuration directory path for studydesk.
/// If profile is Dev, uses "studydesk-dev" instead of "studydesk".
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "studydesk-dev",
        Profile::Prod => "studydesk",
    };
    ProjectDirs::from("com", "studydesk", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Parse a backend timestamp into a wall-clock datetime.
///
/// The backend is not consistent about formats, so this accepts RFC 3339
/// (offset kept as written, not converted), `YYYY-MM-DDTHH:MM[:SS]`,
/// `YYYY-MM-DD HH:MM[:SS]`, and a bare `YYYY-MM-DD` (midnight).
/// Empty or unparseable input yields None.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse what the user typed into the due-date form field.
/// Accepts `YYYY-MM-DD` or `YYYY-MM-DD HH:MM`; the value is taken as UTC
/// and returned in the RFC 3339 shape the backend expects.
pub fn parse_due_input(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| format!("Invalid due date '{}', expected YYYY-MM-DD [HH:MM]", raw))?;
    Ok(parsed
        .and_utc()
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

/// Format a wall-clock time as e.g. "9:00 AM".
pub fn format_clock_time(dt: NaiveDateTime) -> String {
    dt.format("%-I:%M %p").to_string()
}

/// Format a calendar day heading for the plan grid, e.g. "Mon, Aug 25".
pub fn format_day_heading(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// Human distance to a due timestamp, relative to `now`: "due today",
/// "due in 3d", "overdue by 2d", or "no due date" when unparseable.
pub fn format_due_distance(now: NaiveDateTime, due_raw: &str) -> String {
    let Some(due) = parse_timestamp(due_raw) else {
        return "no due date".to_string();
    };
    let days = (due.date() - now.date()).num_days();
    if days == 0 {
        "due today".to_string()
    } else if days > 0 {
        format!("due in {}d", days)
    } else {
        format!("overdue by {}d", -days)
    }
}

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Parsed key binding information
#[derive(Debug, Clone)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

/// Parse a key binding string from config: single characters ("q", "g"),
/// special keys ("Enter", "Space", "Left", "F1"), and "Ctrl+" combinations.
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();
    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }
    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

/// Check whether a key event matches a parsed binding.
pub fn matches_key_event(
    event: crossterm::event::KeyEvent,
    binding: &ParsedKeyBinding,
) -> bool {
    let ctrl_held = event
        .modifiers
        .contains(crossterm::event::KeyModifiers::CONTROL);
    event.code == binding.key_code && ctrl_held == binding.requires_ctrl
}

fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    use crossterm::event::KeyCode;
    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Tab" => Ok(KeyCode::Tab),
        "Backspace" => Ok(KeyCode::Backspace),
        "Delete" => Ok(KeyCode::Delete),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        _ => {
            if let Some(n) = key_str
                .strip_prefix('F')
                .and_then(|n| n.parse::<u8>().ok())
            {
                return Ok(KeyCode::F(n));
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn test_parse_timestamp_accepts_backend_shapes() {
        assert_eq!(
            parse_timestamp("2025-06-01T09:00:00Z").map(format_clock_time),
            Some("9:00 AM".to_string())
        );
        assert_eq!(
            parse_timestamp("2025-06-01T21:30:00").map(format_clock_time),
            Some("9:30 PM".to_string())
        );
        assert!(parse_timestamp("2025-06-01").is_some());
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("next tuesday"), None);
    }

    #[test]
    fn test_parse_due_input_round_trips_to_rfc3339() {
        assert_eq!(
            parse_due_input("2025-06-01 09:30").as_deref(),
            Ok("2025-06-01T09:30:00Z")
        );
        assert_eq!(
            parse_due_input("2025-06-01").as_deref(),
            Ok("2025-06-01T00:00:00Z")
        );
        assert!(parse_due_input("junk").is_err());
    }

    #[test]
    fn test_format_due_distance() {
        let now = parse_timestamp("2025-06-10T12:00:00").unwrap();
        assert_eq!(format_due_distance(now, "2025-06-10T23:00:00"), "due today");
        assert_eq!(format_due_distance(now, "2025-06-13T08:00:00"), "due in 3d");
        assert_eq!(format_due_distance(now, "2025-06-08T08:00:00"), "overdue by 2d");
        assert_eq!(format_due_distance(now, ""), "no due date");
    }

    #[test]
    fn test_parse_key_binding() {
        let binding = parse_key_binding("Ctrl+s").unwrap();
        assert_eq!(binding.key_code, KeyCode::Char('s'));
        assert!(binding.requires_ctrl);

        let binding = parse_key_binding("F1").unwrap();
        assert_eq!(binding.key_code, KeyCode::F(1));
        assert!(!binding.requires_ctrl);

        let binding = parse_key_binding("Space").unwrap();
        assert_eq!(binding.key_code, KeyCode::Char(' '));

        assert!(parse_key_binding("NotAKey").is_err());
    }
}
