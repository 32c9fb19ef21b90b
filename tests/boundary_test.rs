use semrel::boundary::BoundaryWarning;
use semrel::domain::version::validate_tag_format;
use semrel::parser::ConventionalParser;
use semrel::{BranchConfig, History, ReleasePolicy, VersionAnalyzer, VersionTranslator};

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_no_new_commits_display() {
    let warning = BoundaryWarning::NoNewCommits {
        latest_tag: "v1.0.0".to_string(),
        current_commit_hash: "abc1234def5678".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No new commits"),
        "Message should contain 'No new commits', got: {}",
        display_msg
    );
    assert!(display_msg.contains("v1.0.0"));
    assert!(
        display_msg.contains("abc1234") && !display_msg.contains("abc1234d"),
        "Message should contain shortened commit hash 'abc1234', got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_unparsable_tag_display() {
    let warning = BoundaryWarning::UnparsableTag {
        tag: "release-123".to_string(),
        reason: "Invalid format".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("release-123"));
    assert!(display_msg.contains("Invalid format"));
}

#[test]
fn test_boundary_warning_no_previous_release_display() {
    let warning = BoundaryWarning::NoPreviousRelease {
        tag_format: "v{version}".to_string(),
    };
    assert!(warning.to_string().contains("v{version}"));
}

// ============================================================================
// Tag Format Validation Tests
// ============================================================================

#[test]
fn test_validate_tag_format_patterns() {
    assert!(validate_tag_format("v{version}").is_ok());
    assert!(validate_tag_format("release-v{version}-final").is_ok());
    assert!(validate_tag_format("{version}").is_ok());
}

#[test]
fn test_validate_tag_format_invalid_patterns() {
    assert!(validate_tag_format("free-form").is_err());
    assert!(validate_tag_format("").is_err());
    assert!(validate_tag_format("{version}-{version}").is_err());
}

#[test]
fn test_translator_tag_shapes() {
    let translator = VersionTranslator::new("app-v{version}-final", "rc", false).unwrap();
    assert!(translator.from_tag("app-v1.2.3-final").is_some());
    assert!(translator.from_tag("app-v1.2.3").is_none());
    assert!(translator.from_tag("v1.2.3-final").is_none());
    assert!(translator.from_tag("xapp-v1.2.3-final").is_none());
}

// ============================================================================
// Warnings produced at release boundaries
// ============================================================================

fn analyze(history: &History) -> semrel::NextVersion {
    VersionAnalyzer::new(
        VersionTranslator::default(),
        Box::new(ConventionalParser::new()),
        ReleasePolicy::default(),
    )
    .next_version(history, &BranchConfig::release("main"))
    .unwrap()
}

#[test]
fn test_head_on_release_tag_warns() {
    let history = History::linear(&["feat: x"]).with_tag("v1.0.0", "c0");
    let outcome = analyze(&history);
    assert!(!outcome.is_release());
    assert_eq!(
        outcome.warnings,
        vec![BoundaryWarning::NoNewCommits {
            latest_tag: "v1.0.0".to_string(),
            current_commit_hash: "c0".to_string(),
        }]
    );
}

#[test]
fn test_prerelease_without_revision_warns() {
    let history = History::linear(&["chore: init", "fix: a", "fix: b"])
        .with_tag("v1.0.0", "c0")
        .with_tag("v1.1.0-beta", "c1");
    let outcome = analyze(&history);

    assert_eq!(outcome.baseline_tag.as_deref(), Some("v1.0.0"));
    assert!(outcome.warnings.iter().any(|w| matches!(
        w,
        BoundaryWarning::UnparsableTag { tag, .. } if tag == "v1.1.0-beta"
    )));
}

#[test]
fn test_untagged_history_warns_and_starts_at_zero() {
    let history = History::linear(&["chore: init", "fix: a"]);
    let outcome = analyze(&history);
    assert_eq!(outcome.version().unwrap().to_string(), "0.1.0");
    assert!(outcome
        .warnings
        .iter()
        .any(|w| matches!(w, BoundaryWarning::NoPreviousRelease { .. })));
}

#[test]
fn test_unclassified_commit_warns() {
    let history = History::linear(&["chore: init", "WIP"]).with_tag("v1.0.0", "c0");
    let outcome = analyze(&history);
    assert!(!outcome.is_release());
    assert!(outcome
        .warnings
        .iter()
        .any(|w| matches!(w, BoundaryWarning::UnclassifiedCommit { commit_hash, .. } if commit_hash == "c1")));
}
