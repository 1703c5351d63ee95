//! Integration Tests for Refresh, Reset and Add-Rule Flows

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::path::PathBuf;

use test_utils::{rule_set, service_with, workspace_with_markers, MockFilesystem, SettingsOp};
use tintbar::diagnostics::Diagnostic;
use tintbar::{
    ApplyScope, ColorSource, Config, ConfigLoader, Error, RefreshOutcome, RuleError, TintService,
    Trigger,
};

#[test]
fn test_manual_refresh_applies_marker_color() {
    let workspace = workspace_with_markers(&[(".project-color", "#112233")]);
    let folders = vec![workspace.path().to_path_buf()];
    let t = service_with(Config::default(), None);

    let outcome = t.service.refresh(Trigger::Manual, &folders).unwrap();

    assert!(matches!(
        &outcome,
        RefreshOutcome::Applied { color, source: ColorSource::MarkerFile { .. } }
            if color.as_str() == "#112233"
    ));
    assert_eq!(
        t.settings.ops(),
        vec![SettingsOp::Apply {
            scope: ApplyScope::Workspace,
            workspace: Some(workspace.path().to_path_buf()),
            color: "#112233".to_string(),
        }]
    );
}

#[test]
fn test_no_workspace_has_no_side_effect() {
    let t = service_with(Config::default(), None);

    let outcome = t.service.refresh(Trigger::Startup, &[]).unwrap();

    assert_eq!(outcome, RefreshOutcome::NoWorkspace);
    assert!(t.service.resolve(&[]).is_absent());
    assert!(t.settings.ops().is_empty());
}

#[test]
fn test_no_match_leaves_appearance_unchanged() {
    let workspace = workspace_with_markers(&[]);
    let mut config = Config::default();
    config.path_colors = rule_set(&[("no-such-fragment-xyz", "#111111")]);
    let t = service_with(config, None);

    let outcome = t
        .service
        .refresh(Trigger::FileChanged, &[workspace.path().to_path_buf()])
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::Unchanged);
    // Neither apply nor clear
    assert!(t.settings.ops().is_empty());
}

#[test]
fn test_only_first_folder_considered() {
    let first = workspace_with_markers(&[]);
    let second = workspace_with_markers(&[(".iterm-color", "#445566")]);
    let t = service_with(Config::default(), None);

    let outcome = t
        .service
        .refresh(
            Trigger::FolderChanged,
            &[first.path().to_path_buf(), second.path().to_path_buf()],
        )
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::Unchanged);
}

#[test]
fn test_auto_apply_off_only_manual_applies() {
    let workspace = workspace_with_markers(&[(".iterm-color", "#445566")]);
    let folders = vec![workspace.path().to_path_buf()];
    let mut config = Config::default();
    config.auto_apply = false;
    let t = service_with(config, None);

    for trigger in [
        Trigger::Startup,
        Trigger::FileChanged,
        Trigger::FolderChanged,
        Trigger::ConfigChanged,
    ] {
        assert_eq!(
            t.service.refresh(trigger, &folders).unwrap(),
            RefreshOutcome::Skipped
        );
    }
    assert!(t.settings.ops().is_empty());

    let outcome = t.service.refresh(Trigger::Manual, &folders).unwrap();
    assert!(matches!(outcome, RefreshOutcome::Applied { .. }));
    assert_eq!(t.settings.ops().len(), 1);
}

#[test]
fn test_global_scope_passed_to_settings() {
    let workspace = workspace_with_markers(&[(".iterm-color", "#445566")]);
    let mut config = Config::default();
    config.apply_scope = ApplyScope::Global;
    let t = service_with(config, None);

    t.service
        .refresh(Trigger::Manual, &[workspace.path().to_path_buf()])
        .unwrap();

    assert!(matches!(
        t.settings.ops().as_slice(),
        [SettingsOp::Apply { scope: ApplyScope::Global, .. }]
    ));
}

#[test]
fn test_reset_clears() {
    let workspace = workspace_with_markers(&[]);
    let t = service_with(Config::default(), None);

    t.service.reset(&[workspace.path().to_path_buf()]).unwrap();

    assert_eq!(
        t.settings.ops(),
        vec![SettingsOp::Clear {
            scope: ApplyScope::Workspace,
            workspace: Some(workspace.path().to_path_buf()),
        }]
    );
}

#[test]
fn test_add_rule_persists_and_applies_on_refresh() {
    let parent = tempfile::TempDir::new().unwrap();
    let workspace = parent.path().join("clients").join("acme");
    std::fs::create_dir_all(&workspace).unwrap();
    let mut t = service_with(Config::default(), None);

    let rules = t.service.add_rule("acme", "#ff0000").unwrap();
    assert_eq!(rules.get("acme"), Some("#ff0000"));

    // Written to the configuration file
    let reloaded = ConfigLoader::with_path(t.config_file()).load().unwrap();
    assert_eq!(reloaded.path_colors.get("acme"), Some("#ff0000"));

    let outcome = t.service.refresh(Trigger::Manual, &[workspace]).unwrap();
    assert!(matches!(
        outcome,
        RefreshOutcome::Applied { source: ColorSource::PatternRule { ref pattern }, .. }
            if pattern == "acme"
    ));
}

#[test]
fn test_add_rule_rejection_writes_nothing() {
    let mut config = Config::default();
    config.path_colors = rule_set(&[("home", "#00ff00")]);
    let mut t = service_with(config.clone(), None);

    let result = t.service.add_rule("work", "red");

    assert!(matches!(
        result,
        Err(Error::RuleRejected(RuleError::InvalidColorFormat(ref c))) if c == "red"
    ));
    assert_eq!(t.service.config(), &config);
    assert!(!t.config_file().exists());
}

#[test]
fn test_add_rule_keeps_other_settings() {
    let mut config = Config::default();
    config.case_sensitive = true;
    config.path_colors = rule_set(&[("legacy", "not-a-color")]);
    let mut t = service_with(config, None);

    t.service.add_rule("new", "#123456").unwrap();

    let reloaded = ConfigLoader::with_path(t.config_file()).load().unwrap();
    assert!(reloaded.case_sensitive);
    // Hand-edited entries survive the rewrite even when invalid
    assert_eq!(reloaded.path_colors.get("legacy"), Some("not-a-color"));
    assert_eq!(
        reloaded.path_colors.iter().map(|(p, _)| p).collect::<Vec<_>>(),
        vec!["legacy", "new"]
    );
}

#[test]
fn test_reload_config_picks_up_edits() {
    let workspace = workspace_with_markers(&[]);
    let folders = vec![workspace.path().to_path_buf()];
    let mut t = service_with(Config::default(), None);
    assert_eq!(
        t.service.refresh(Trigger::Startup, &folders).unwrap(),
        RefreshOutcome::Unchanged
    );

    std::fs::write(
        t.config_file(),
        "match_type = \"contains\"\n\n[path_colors]\n\"\" = \"#0a0a0a\"\n",
    )
    .unwrap();
    t.service.reload_config().unwrap();

    let outcome = t.service.refresh(Trigger::ConfigChanged, &folders).unwrap();
    assert!(matches!(outcome, RefreshOutcome::Applied { ref color, .. } if color.as_str() == "#0a0a0a"));
}

const BROKEN_CONFIG: &str = "[path_colors]\n\"work\" = \"#222222\"\n\"home\" = \"#00ff00\"\n\"acme = \"#ff0000\n";

#[test]
fn test_broken_config_is_not_replaced_by_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, BROKEN_CONFIG).unwrap();

    let result = TintService::new(ConfigLoader::with_path(path.clone()));

    assert!(matches!(result, Err(Error::ConfigParseFailed { .. })));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), BROKEN_CONFIG);
}

#[test]
fn test_add_rule_leaves_broken_config_untouched() {
    let mut config = Config::default();
    config.path_colors = rule_set(&[("work", "#222222")]);
    let mut t = service_with(config.clone(), None);
    t.service.add_rule("home", "#00ff00").unwrap();
    let loaded = t.service.config().clone();

    std::fs::write(t.config_file(), BROKEN_CONFIG).unwrap();

    // The previous configuration stays in effect
    assert!(t.service.reload_config().is_err());
    assert_eq!(t.service.config(), &loaded);

    assert!(t.service.add_rule("acme", "#ff0000").is_err());
    assert_eq!(std::fs::read_to_string(t.config_file()).unwrap(), BROKEN_CONFIG);
    assert_eq!(t.service.config(), &loaded);
}

#[test]
fn test_add_rule_keeps_rules_edited_on_disk() {
    let mut t = service_with(Config::default(), None);
    t.service.add_rule("first", "#111111").unwrap();

    std::fs::write(
        t.config_file(),
        "[path_colors]\nfirst = \"#111111\"\nedited = \"#222222\"\n",
    )
    .unwrap();
    let rules = t.service.add_rule("second", "#333333").unwrap();

    assert_eq!(
        rules.iter().map(|(p, _)| p).collect::<Vec<_>>(),
        vec!["first", "edited", "second"]
    );
}

#[test]
fn test_diagnostics_reach_injected_sink() {
    let fs = MockFilesystem::new().with_file("/code/app/.project-color", "nope");
    let t = service_with(Config::default(), Some(Box::new(fs)));

    let resolution = t.service.resolve(&[PathBuf::from("/code/app")]);

    assert!(resolution.is_absent());
    assert_eq!(
        t.diagnostics.entries(),
        vec![Diagnostic::InvalidMarkerColor {
            path: PathBuf::from("/code/app/.project-color"),
            content: "nope".to_string(),
        }]
    );
}

#[test]
fn test_status_messages_name_provenance() {
    let workspace = workspace_with_markers(&[(".iterm-color", "#445566")]);
    let t = service_with(Config::default(), None);

    let outcome = t
        .service
        .refresh(Trigger::Manual, &[workspace.path().to_path_buf()])
        .unwrap();

    assert_eq!(
        outcome.status_message(),
        "Title bar color #445566 from marker file .iterm-color"
    );
}
