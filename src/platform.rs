//! Platform identity, reserved accelerators, and default menu loading.
//!
//! Each platform ships a default menu definition as TOML, embedded in the
//! binary and overridable by a `menus/` directory on disk. Platforms also
//! reserve certain keystroke shapes for system use; those never surface as
//! menu accelerators.

use crate::menu::MenuItem;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The platform the menu is being built for.
///
/// Carried explicitly rather than read from `cfg!` at use sites, so tests
/// exercise every platform's rules regardless of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Macos,
    Windows,
}

impl Platform {
    /// Returns the platform the process is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Macos
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }

    /// Parses a platform name as used for menu files (`linux`, `macos`,
    /// `windows`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linux" => Some(Platform::Linux),
            "macos" => Some(Platform::Macos),
            "windows" => Some(Platform::Windows),
            _ => None,
        }
    }

    /// Whether menu labels use `&` mnemonic markers on this platform.
    pub fn uses_mnemonics(&self) -> bool {
        !matches!(self, Platform::Macos)
    }

    /// File name of this platform's menu definition under a `menus/`
    /// directory.
    pub fn menu_file(&self) -> &'static str {
        match self {
            Platform::Linux => "linux.toml",
            Platform::Macos => "macos.toml",
            Platform::Windows => "windows.toml",
        }
    }

    /// Whether a keystroke is reserved for system use on this platform and
    /// must not be shown as a menu accelerator.
    ///
    /// macOS reserves alt plus a single character (option-key character
    /// input); Windows reserves ctrl-alt plus a single character (AltGr).
    pub fn reserves_keystroke(&self, keystrokes: &str) -> bool {
        let stripped = match self {
            Platform::Macos => keystrokes.strip_prefix("alt-"),
            Platform::Windows => keystrokes.strip_prefix("ctrl-alt-"),
            Platform::Linux => return false,
        };
        let Some(stripped) = stripped else {
            return false;
        };
        let key = stripped.strip_prefix("shift-").unwrap_or(stripped);
        key.chars().count() == 1
    }

    /// The menu definition compiled into the binary for this platform.
    fn embedded_menu(&self) -> &'static str {
        match self {
            Platform::Linux => include_str!("../menus/linux.toml"),
            Platform::Macos => include_str!("../menus/macos.toml"),
            Platform::Windows => include_str!("../menus/windows.toml"),
        }
    }
}

/// TOML shape of a menu definition file.
#[derive(Debug, Deserialize)]
struct MenuFile {
    #[serde(default)]
    menu: Vec<MenuItem>,
}

/// Parses a menu definition from TOML.
pub fn parse_menu(toml_str: &str) -> Result<Vec<MenuItem>> {
    let file: MenuFile = toml::from_str(toml_str).context("Failed to parse menu definition")?;
    Ok(file.menu)
}

/// Loads the default menu for a platform.
///
/// With a `menus_dir`, reads `<dir>/<platform>.toml`; a missing or invalid
/// file is a hard failure, since no fallback default menu exists for a
/// platform. Without one, the embedded definition is used. Items are
/// returned raw; normalization happens when they enter the menu manager.
pub fn default_menu(platform: Platform, menus_dir: Option<&Path>) -> Result<Vec<MenuItem>> {
    match menus_dir {
        Some(dir) => {
            let path = dir.join(platform.menu_file());
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read menu definition: {:?}", path))?;
            parse_menu(&contents).with_context(|| format!("Invalid menu definition: {:?}", path))
        }
        None => parse_menu(platform.embedded_menu()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_current_platform_is_stable() {
        assert_eq!(Platform::current(), Platform::current());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Platform::from_name("linux"), Some(Platform::Linux));
        assert_eq!(Platform::from_name("macos"), Some(Platform::Macos));
        assert_eq!(Platform::from_name("windows"), Some(Platform::Windows));
        assert_eq!(Platform::from_name("darwin"), None);
    }

    #[test]
    fn test_reserved_keystrokes_on_macos() {
        let p = Platform::Macos;
        assert!(p.reserves_keystroke("alt-a"));
        assert!(p.reserves_keystroke("alt-shift-a"));
        assert!(!p.reserves_keystroke("alt-f4"));
        assert!(!p.reserves_keystroke("ctrl-alt-a"));
        assert!(!p.reserves_keystroke("cmd-s"));
    }

    #[test]
    fn test_reserved_keystrokes_on_windows() {
        let p = Platform::Windows;
        assert!(p.reserves_keystroke("ctrl-alt-e"));
        assert!(p.reserves_keystroke("ctrl-alt-shift-e"));
        assert!(!p.reserves_keystroke("ctrl-alt-delete"));
        assert!(!p.reserves_keystroke("alt-e"));
    }

    #[test]
    fn test_nothing_reserved_on_linux() {
        let p = Platform::Linux;
        assert!(!p.reserves_keystroke("alt-a"));
        assert!(!p.reserves_keystroke("ctrl-alt-e"));
    }

    #[test]
    fn test_embedded_menus_parse_for_all_platforms() {
        for platform in [Platform::Linux, Platform::Macos, Platform::Windows] {
            let menu = default_menu(platform, None).unwrap();
            assert!(!menu.is_empty(), "empty menu for {:?}", platform);
        }
    }

    #[test]
    fn test_embedded_menus_contain_packages_menu() {
        for platform in [Platform::Linux, Platform::Macos, Platform::Windows] {
            let menu = default_menu(platform, None).unwrap();
            let found = menu.iter().any(|item| {
                crate::menu::normalize_label(&item.label, platform) == "Packages"
            });
            assert!(found, "no Packages menu for {:?}", platform);
        }
    }

    #[test]
    fn test_parse_menu_with_nested_submenus() {
        let toml = r#"
            [[menu]]
            label = "&File"

            [[menu.submenu]]
            label = "&Open"
            command = "application:open"

            [[menu.submenu]]
            label = "Recent"

            [[menu.submenu.submenu]]
            label = "Clear"
            command = "recent:clear"
        "#;
        let menu = parse_menu(toml).unwrap();
        assert_eq!(menu.len(), 1);
        let file = &menu[0];
        assert_eq!(file.label, "&File");
        let submenu = file.submenu.as_ref().unwrap();
        assert_eq!(submenu.len(), 2);
        let recent = submenu[1].submenu.as_ref().unwrap();
        assert_eq!(recent[0].command.as_deref(), Some("recent:clear"));
    }

    #[test]
    fn test_default_menu_from_disk_overrides_embedded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("linux.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[[menu]]\nlabel = \"&Custom\"").unwrap();

        let menu = default_menu(Platform::Linux, Some(dir.path())).unwrap();
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].label, "&Custom");
    }

    #[test]
    fn test_default_menu_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = default_menu(Platform::Windows, Some(dir.path())).unwrap_err();
        assert!(err.to_string().contains("windows.toml"));
    }

    #[test]
    fn test_default_menu_invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("linux.toml"), "not [ valid { toml").unwrap();
        let err = default_menu(Platform::Linux, Some(dir.path())).unwrap_err();
        assert!(err.to_string().contains("linux.toml"));
    }
}
