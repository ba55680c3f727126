use since::boundary::BoundaryWarning;
use since::cli::{list_changes, WorkflowArgs};
use since::config::Config;
use since::git::MockRepository;
use since::ui;

use chrono::{DateTime, TimeZone, Utc};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_no_new_commits_display() {
    let warning = BoundaryWarning::NoNewCommits {
        tag: "v1.0.0".to_string(),
        head_sha: "abc1234def5678".to_string(),
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
        "Message should contain the 7 character hash, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_short_hash_kept_whole() {
    let warning = BoundaryWarning::NoNewCommits {
        tag: "0.1.0".to_string(),
        head_sha: "abc".to_string(),
    };

    assert_eq!(
        warning.to_string(),
        "No new commits since tag '0.1.0' (current: abc)"
    );
}

#[test]
fn test_boundary_warning_unparsable_tag_display() {
    let warning = BoundaryWarning::UnparsableTag {
        tag: "release-123".to_string(),
        reason: "Invalid format".to_string(),
    };

    assert_eq!(
        warning.to_string(),
        "Cannot parse tag 'release-123': Invalid format"
    );
}

#[test]
fn test_boundary_warning_no_conventional_commits_display() {
    let warning = BoundaryWarning::NoConventionalCommits { commit_count: 3 };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("3 commits"), "got: {}", display_msg);
    assert!(display_msg.contains("conventional type"));
}

#[test]
fn test_display_boundary_warning_does_not_panic() {
    ui::display_boundary_warning(&BoundaryWarning::NoConventionalCommits { commit_count: 1 });
}

// ============================================================================
// Warnings raised by workflows
// ============================================================================

#[test]
fn test_list_changes_without_new_commits_warns() {
    let mut repo = MockRepository::new();
    let oid = repo.add_commit("feat: first", at(0));
    repo.add_tag("0.1.0", oid);

    let (changes, warnings) =
        list_changes(&repo, &WorkflowArgs::default(), &Config::default()).unwrap();

    assert!(changes.is_empty());
    assert_eq!(warnings.len(), 1);
    match &warnings[0] {
        BoundaryWarning::NoNewCommits { tag, head_sha } => {
            assert_eq!(tag, "0.1.0");
            assert_eq!(head_sha, &oid.to_string());
        }
        other => panic!("unexpected warning: {:?}", other),
    }
}

#[test]
fn test_list_changes_names_explicit_start_tag() {
    let mut repo = MockRepository::new();
    let first = repo.add_commit("feat: first", at(0));
    repo.add_tag("0.1.0", first);
    let second = repo.add_commit("fix: second", at(10));
    repo.add_tag("0.1.1", second);

    let args = WorkflowArgs {
        after_tag: Some("0.1.1".to_string()),
        ..WorkflowArgs::default()
    };
    let (_, warnings) = list_changes(&repo, &args, &Config::default()).unwrap();

    assert!(matches!(
        warnings.as_slice(),
        [BoundaryWarning::NoNewCommits { tag, .. }] if tag == "0.1.1"
    ));
}

#[test]
fn test_list_changes_with_typed_commits_has_no_warnings() {
    let mut repo = MockRepository::new();
    let oid = repo.add_commit("feat: first", at(0));
    repo.add_tag("0.1.0", oid);
    repo.add_commit("fix: crash on empty input", at(10));

    let (changes, warnings) =
        list_changes(&repo, &WorkflowArgs::default(), &Config::default()).unwrap();

    assert_eq!(changes, "### Fixed\n- fix: crash on empty input");
    assert!(warnings.is_empty());
}
