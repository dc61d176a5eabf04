//! Integration tests for platform menu loading and snapshot writing.

use appmenu::keybinding::KeystrokeMap;
use appmenu::menu::MenuItem;
use appmenu::platform::{self, Platform};
use appmenu::renderer::{RendererProxy, SnapshotWriter};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_embedded_menus_load_and_normalize() {
    for platform in [Platform::Linux, Platform::Macos, Platform::Windows] {
        let mut items = platform::default_menu(platform, None).unwrap();
        assert!(!items.is_empty(), "empty menu for {:?}", platform);

        for item in &mut items {
            item.normalize(platform);
        }
        let labels: Vec<&str> = items
            .iter()
            .map(|i| i.normalized_label.as_deref().unwrap())
            .collect();
        assert!(labels.contains(&"File"), "no File menu for {:?}", platform);
        assert!(
            labels.contains(&"Packages"),
            "no Packages menu for {:?}",
            platform
        );
    }
}

#[test]
fn test_menus_dir_overrides_embedded_definitions() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("linux.toml"),
        r#"
            [[menu]]
            label = "&Custom"

            [[menu.submenu]]
            label = "&Action"
            command = "custom:action"
        "#,
    )
    .unwrap();

    let items = platform::default_menu(Platform::Linux, Some(dir.path())).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "&Custom");
    assert_eq!(
        items[0].submenu.as_ref().unwrap()[0].command.as_deref(),
        Some("custom:action")
    );
}

#[test]
fn test_missing_platform_file_fails_with_path_context() {
    let dir = tempdir().unwrap();
    let err = platform::default_menu(Platform::Macos, Some(dir.path())).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("macos.toml"), "unexpected error: {message}");
}

#[test]
fn test_snapshot_write_and_read_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("menu.json");
    let mut writer = SnapshotWriter::new(path.clone());

    let template = vec![MenuItem::branch(
        "File",
        vec![MenuItem::leaf("Save", "core:save")],
    )];
    let mut keystrokes = KeystrokeMap::new();
    keystrokes.insert("core:save".to_string(), vec!["ctrl-s".to_string()]);

    writer.update_application_menu(&template, &keystrokes).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["message"], "update-application-menu");
    assert_eq!(parsed["template"][0]["submenu"][0]["command"], "core:save");
    assert_eq!(parsed["keystrokes_by_command"]["core:save"][0], "ctrl-s");

    // Atomic write leaves no temp file behind.
    assert!(!dir.path().join("menu.json.tmp").exists());
}
