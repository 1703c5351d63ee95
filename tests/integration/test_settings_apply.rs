//! Integration Tests for Writing Settings Files

use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

use tintbar::settings::{
    ACTIVE_BACKGROUND_KEY, COLOR_CUSTOMIZATIONS_KEY, INACTIVE_BACKGROUND_KEY,
};
use tintbar::{Error, HexColor, SettingsFileWriter, SettingsSink};

fn read_json(writer: &SettingsFileWriter) -> Value {
    serde_json::from_str(&fs::read_to_string(writer.path()).unwrap()).unwrap()
}

fn color(text: &str) -> HexColor {
    HexColor::parse(text).unwrap()
}

#[test]
fn test_apply_preserves_unrelated_settings() {
    let workspace = TempDir::new().unwrap();
    let writer = SettingsFileWriter::workspace(workspace.path());
    fs::create_dir_all(writer.path().parent().unwrap()).unwrap();
    fs::write(
        writer.path(),
        r##"{
  "editor.fontSize": 14,
  "workbench.colorCustomizations": {
    "statusBar.background": "#000000"
  }
}"##,
    )
    .unwrap();

    writer.apply(&color("#112233")).unwrap();

    let settings = read_json(&writer);
    assert_eq!(settings["editor.fontSize"], 14);
    assert_eq!(
        settings[COLOR_CUSTOMIZATIONS_KEY],
        json!({
            "statusBar.background": "#000000",
            "titleBar.activeBackground": "#112233",
            "titleBar.inactiveBackground": "#112233",
        })
    );
}

#[test]
fn test_apply_twice_overwrites() {
    let workspace = TempDir::new().unwrap();
    let writer = SettingsFileWriter::workspace(workspace.path());

    writer.apply(&color("#111111")).unwrap();
    writer.apply(&color("#222222")).unwrap();

    let settings = read_json(&writer);
    assert_eq!(settings[COLOR_CUSTOMIZATIONS_KEY][ACTIVE_BACKGROUND_KEY], "#222222");
    assert_eq!(settings[COLOR_CUSTOMIZATIONS_KEY][INACTIVE_BACKGROUND_KEY], "#222222");
}

#[test]
fn test_apply_same_color_does_not_rewrite() {
    let workspace = TempDir::new().unwrap();
    let writer = SettingsFileWriter::workspace(workspace.path());
    writer.apply(&color("#111111")).unwrap();

    // Reformat by hand; an unchanged apply must leave the text alone
    let compact = r##"{"workbench.colorCustomizations":{"titleBar.activeBackground":"#111111","titleBar.inactiveBackground":"#111111"}}"##;
    fs::write(writer.path(), compact).unwrap();

    writer.apply(&color("#111111")).unwrap();
    assert_eq!(fs::read_to_string(writer.path()).unwrap(), compact);
}

#[test]
fn test_clear_removes_only_title_bar_keys() {
    let workspace = TempDir::new().unwrap();
    let writer = SettingsFileWriter::workspace(workspace.path());
    fs::create_dir_all(writer.path().parent().unwrap()).unwrap();
    fs::write(
        writer.path(),
        r##"{
  "workbench.colorCustomizations": {
    "statusBar.background": "#000000",
    "titleBar.activeBackground": "#112233",
    "titleBar.inactiveBackground": "#112233"
  }
}"##,
    )
    .unwrap();

    writer.clear().unwrap();

    let settings = read_json(&writer);
    assert_eq!(
        settings[COLOR_CUSTOMIZATIONS_KEY],
        json!({ "statusBar.background": "#000000" })
    );
}

#[test]
fn test_clear_drops_empty_customizations() {
    let workspace = TempDir::new().unwrap();
    let writer = SettingsFileWriter::workspace(workspace.path());

    writer.apply(&color("#abc")).unwrap();
    writer.clear().unwrap();

    let settings = read_json(&writer);
    assert_eq!(settings, json!({}));
}

#[test]
fn test_invalid_json_is_never_overwritten() {
    let workspace = TempDir::new().unwrap();
    let writer = SettingsFileWriter::workspace(workspace.path());
    fs::create_dir_all(writer.path().parent().unwrap()).unwrap();
    let original = "{ \"editor.fontSize\": 14, }";
    fs::write(writer.path(), original).unwrap();

    let result = writer.apply(&color("#112233"));

    assert!(matches!(result, Err(Error::SettingsParseFailed { .. })));
    assert_eq!(fs::read_to_string(writer.path()).unwrap(), original);
}

#[test]
fn test_non_object_customizations_rejected() {
    let workspace = TempDir::new().unwrap();
    let writer = SettingsFileWriter::workspace(workspace.path());
    fs::create_dir_all(writer.path().parent().unwrap()).unwrap();
    fs::write(writer.path(), r#"{"workbench.colorCustomizations": "oops"}"#).unwrap();

    assert!(matches!(
        writer.apply(&color("#112233")),
        Err(Error::SettingsParseFailed { .. })
    ));
}

#[test]
fn test_empty_file_treated_as_empty_object() {
    let workspace = TempDir::new().unwrap();
    let writer = SettingsFileWriter::workspace(workspace.path());
    fs::create_dir_all(writer.path().parent().unwrap()).unwrap();
    fs::write(writer.path(), "   \n").unwrap();

    writer.apply(&color("#123")).unwrap();
    assert_eq!(
        read_json(&writer)[COLOR_CUSTOMIZATIONS_KEY][ACTIVE_BACKGROUND_KEY],
        "#123"
    );
}
