use ratatui::style::Color;

use crate::models::Priority;

/// Parse a color string from the theme config into a ratatui Color.
/// Supports the named terminal colors and hex (#RRGGBB or #RGB).
/// Unrecognized strings fall back to white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();
    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => {
            if s.starts_with('#') {
                if let Some(color) = parse_hex_color(&s) {
                    return color;
                }
            }
            Color::White
        }
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim_start_matches('#');
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    if hex.len() == 3 {
        // #RGB expands per digit: 0xF -> 0xFF
        let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
        let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
        let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
        return Some(Color::Rgb((r << 4) | r, (g << 4) | g, (b << 4) | b));
    }
    None
}

/// Format a Color back to its config string form.
pub fn format_color_for_display(color: &Color) -> String {
    match color {
        Color::Black => "black".to_string(),
        Color::Red => "red".to_string(),
        Color::Green => "green".to_string(),
        Color::Yellow => "yellow".to_string(),
        Color::Blue => "blue".to_string(),
        Color::Magenta => "magenta".to_string(),
        Color::Cyan => "cyan".to_string(),
        Color::White => "white".to_string(),
        Color::Gray => "gray".to_string(),
        Color::DarkGray => "darkgray".to_string(),
        Color::LightRed => "lightred".to_string(),
        Color::LightGreen => "lightgreen".to_string(),
        Color::LightYellow => "lightyellow".to_string(),
        Color::LightBlue => "lightblue".to_string(),
        Color::LightMagenta => "lightmagenta".to_string(),
        Color::LightCyan => "lightcyan".to_string(),
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Indexed(_) => "indexed".to_string(),
        Color::Reset => "reset".to_string(),
    }
}

/// Relative luminance (WCAG formula), 0.0 dark to 1.0 light.
fn calculate_luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Foreground that stays readable on the given background. Named colors
/// use a brightness heuristic matching how terminals usually render them.
pub fn get_contrast_text_color(background: Color) -> Color {
    let dark = match background {
        Color::Rgb(r, g, b) => calculate_luminance(r, g, b) < 0.5,
        Color::Black | Color::Blue | Color::Magenta | Color::Red => true,
        _ => false,
    };
    if dark { Color::White } else { Color::Black }
}

/// Color band for a 1-5 difficulty rating: easy tasks green, middling
/// yellow, hard red.
pub fn difficulty_color(difficulty: u8) -> Color {
    match difficulty {
        0..=2 => Color::Green,
        3 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Color for a task status. Every status has a fixed color; adding a
/// status without one is a compile error.
pub fn status_color(status: Priority) -> Color {
    match status {
        Priority::Pending => Color::Gray,
        Priority::Ongoing => Color::Blue,
        Priority::Completed => Color::Green,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_hex_colors() {
        assert_eq!(parse_color("blue"), Color::Blue);
        assert_eq!(parse_color("GREY"), Color::Gray);
        assert_eq!(parse_color("#FF8000"), Color::Rgb(255, 128, 0));
        assert_eq!(parse_color("#f00"), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("not-a-color"), Color::White);
    }

    #[test]
    fn test_contrast_text_color() {
        assert_eq!(get_contrast_text_color(Color::Black), Color::White);
        assert_eq!(get_contrast_text_color(Color::Yellow), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Rgb(10, 10, 40)), Color::White);
        assert_eq!(get_contrast_text_color(Color::Rgb(240, 240, 200)), Color::Black);
    }

    #[test]
    fn test_difficulty_bands_at_boundaries() {
        assert_eq!(difficulty_color(1), Color::Green);
        assert_eq!(difficulty_color(2), Color::Green);
        assert_eq!(difficulty_color(3), Color::Yellow);
        assert_eq!(difficulty_color(4), Color::Red);
        assert_eq!(difficulty_color(5), Color::Red);
    }

    #[test]
    fn test_every_status_has_a_color() {
        assert_eq!(status_color(Priority::Pending), Color::Gray);
        assert_eq!(status_color(Priority::Ongoing), Color::Blue);
        assert_eq!(status_color(Priority::Completed), Color::Green);
    }
}
