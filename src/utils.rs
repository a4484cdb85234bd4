use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

/// Get the configuration directory path
/// If profile is Dev, uses "mydaily-dev" instead of "mydaily"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "mydaily-dev",
        Profile::Prod => "mydaily",
    };
    ProjectDirs::from("com", "mydaily", app_name).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path (holds the SQLite file)
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "mydaily-dev",
        Profile::Prod => "mydaily",
    };
    ProjectDirs::from("com", "mydaily", app_name).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Today's date in the local timezone
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parsed key binding information
#[derive(Debug, Clone)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

/// Check if a key event has the primary modifier (Ctrl on Windows/Linux,
/// Option/Alt on macOS, treated as equivalent per the usual TUI pattern)
pub fn has_primary_modifier(modifiers: crossterm::event::KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
            || modifiers.contains(crossterm::event::KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
    }
}

/// Format a key binding string for display, showing the platform-appropriate modifier
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config into a ParsedKeyBinding
/// Supports single keys ("q", "j"), special keys ("Enter", "Left", "F1"),
/// and the Ctrl modifier ("Ctrl+s")
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

fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    use crossterm::event::KeyCode;

    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Delete" => Ok(KeyCode::Delete),
        "F1" => Ok(KeyCode::F(1)),
        "F2" => Ok(KeyCode::F(2)),
        "F3" => Ok(KeyCode::F(3)),
        "F4" => Ok(KeyCode::F(4)),
        _ => {
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
    fn parses_plain_and_ctrl_bindings() {
        let plain = parse_key_binding("q").unwrap();
        assert_eq!(plain.key_code, KeyCode::Char('q'));
        assert!(!plain.requires_ctrl);

        let ctrl = parse_key_binding("Ctrl+s").unwrap();
        assert_eq!(ctrl.key_code, KeyCode::Char('s'));
        assert!(ctrl.requires_ctrl);
    }

    #[test]
    fn parses_special_keys() {
        assert_eq!(parse_key_binding("Enter").unwrap().key_code, KeyCode::Enter);
        assert_eq!(
            parse_key_binding("Space").unwrap().key_code,
            KeyCode::Char(' ')
        );
        assert_eq!(parse_key_binding("F1").unwrap().key_code, KeyCode::F(1));
    }

    #[test]
    fn rejects_unknown_bindings() {
        assert!(parse_key_binding("SuperHyper+q").is_err());
        assert!(parse_key_binding("qq").is_err());
    }

    #[test]
    fn parses_iso_dates() {
        assert!(parse_date("2024-03-15").is_ok());
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }
}
