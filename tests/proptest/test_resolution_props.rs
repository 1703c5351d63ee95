//! Property-based tests for color resolution

use proptest::prelude::*;
use std::path::PathBuf;

use tintbar::diagnostics::NullDiagnostics;
use tintbar::platform::{FilesystemOps, LocalFilesystem};
use tintbar::{
    match_path, ColorResolver, HexColor, MarkerFileSet, MatchStrategy, PathColorRule, RuleSet,
};

fn strategy() -> impl Strategy<Value = MatchStrategy> {
    prop_oneof![
        Just(MatchStrategy::Contains),
        Just(MatchStrategy::Exact),
        Just(MatchStrategy::EndsWith),
    ]
}

fn path_rules() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-zA-Z/-]{0,6}", "#[0-9a-f]{6}"), 0..8)
}

proptest! {
    #[test]
    fn test_match_is_first_declared_hit(
        path in "/[a-zA-Z/-]{0,24}",
        entries in path_rules(),
        strategy in strategy(),
        case_sensitive in any::<bool>(),
    ) {
        let rules: Vec<PathColorRule> = entries
            .iter()
            .map(|(p, c)| PathColorRule::new(p.clone(), HexColor::parse(c).unwrap()))
            .collect();

        let hit = match_path(&path, &rules, &strategy, case_sensitive);

        let fold = |s: &str| if case_sensitive { s.to_string() } else { s.to_lowercase() };
        let expected = rules.iter().find(|rule| {
            let (p, r) = (fold(&path), fold(&rule.pattern));
            match strategy {
                MatchStrategy::Contains => p.contains(&r),
                MatchStrategy::Exact => p == r,
                MatchStrategy::EndsWith => p.ends_with(&r),
                MatchStrategy::Unknown(_) => false,
            }
        });
        prop_assert_eq!(hit, expected);
    }

    #[test]
    fn test_exact_match_implies_equal_paths(
        path in "/[a-z/]{0,16}",
        pattern in "[a-z/]{0,16}",
    ) {
        let rules = vec![PathColorRule::new(pattern.clone(), HexColor::parse("#fff").unwrap())];
        let hit = match_path(&path, &rules, &MatchStrategy::Exact, true).is_some();
        prop_assert_eq!(hit, path == pattern);
    }

    #[test]
    fn test_resolution_is_deterministic(
        marker in prop::option::of("#[0-9a-f]{6}|[a-z]{1,6}"),
        entries in path_rules(),
        strategy in strategy(),
        case_sensitive in any::<bool>(),
    ) {
        let dir = tempfile::TempDir::new().unwrap();
        if let Some(content) = &marker {
            std::fs::write(dir.path().join(".iterm-color"), content).unwrap();
        }
        let rules: RuleSet = entries.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();

        let fs = LocalFilesystem::new();
        let resolver = ColorResolver::new(&fs, &NullDiagnostics);
        let first = resolver.resolve(dir.path(), MarkerFileSet::ProjectAndIterm, &rules, &strategy, case_sensitive);
        let second = resolver.resolve(dir.path(), MarkerFileSet::ProjectAndIterm, &rules, &strategy, case_sensitive);
        prop_assert_eq!(&first, &second);

        // A valid marker always wins
        if let Some(content) = marker.as_deref().filter(|c| HexColor::is_valid(c)) {
            prop_assert_eq!(first.color().map(HexColor::as_str), Some(content));
            prop_assert!(first.source().unwrap().is_marker_file());
        } else if let Some(source) = first.source() {
            prop_assert!(source.is_pattern_rule());
        }
    }

    #[test]
    fn test_missing_workspace_never_panics(name in "[a-z]{1,12}") {
        let fs = LocalFilesystem::new();
        let workspace = PathBuf::from("/nonexistent-tintbar-root").join(name);
        prop_assert!(!fs.exists(&workspace.join(".project-color")));

        let resolution = ColorResolver::new(&fs, &NullDiagnostics).resolve(
            &workspace,
            MarkerFileSet::ProjectAndIterm,
            &RuleSet::new(),
            &MatchStrategy::Contains,
            false,
        );
        prop_assert!(resolution.is_absent());
    }
}
