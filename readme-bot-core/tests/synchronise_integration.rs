use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use readme_bot_core::config::UpdateConfig;
use readme_bot_core::contract::{
    CommitResult, DocumentContent, FileChange, FileStatus, MockContentGenerator, MockSourceHost,
};
use readme_bot_core::event::{PushEvent, RepoCoordinates, TriggerEvent};
use readme_bot_core::synchronise::{synchronise, Outcome};

fn push_event() -> TriggerEvent {
    TriggerEvent::Push(PushEvent {
        repository: RepoCoordinates {
            owner: "octo".to_string(),
            repo: "widgets".to_string(),
        },
        before: "abc123".to_string(),
        after: "def456".to_string(),
    })
}

fn modified(name: &str, patch: &str) -> FileChange {
    FileChange {
        filename: name.to_string(),
        status: FileStatus::Modified,
        patch: Some(patch.to_string()),
    }
}

fn host_with_files(files: Vec<FileChange>) -> MockSourceHost {
    let mut host = MockSourceHost::new();
    host.expect_compare_commits()
        .times(1)
        .returning(move |owner, repo, base, head| {
            assert_eq!(owner, "octo");
            assert_eq!(repo, "widgets");
            assert_eq!(base, "abc123");
            assert_eq!(head, "def456");
            Ok(files.clone())
        });
    host
}

#[tokio::test]
async fn non_push_event_makes_no_calls_and_succeeds() {
    let mut host = MockSourceHost::new();
    host.expect_compare_commits().never();
    let mut generator = MockContentGenerator::new();
    generator.expect_generate_content().never();

    let event = TriggerEvent::Other {
        event_name: "pull_request".to_string(),
    };
    let report = synchronise(&UpdateConfig::default(), &event, &host, &generator)
        .await
        .expect("non-push event should be a successful no-op");

    assert_eq!(
        report.outcome,
        Outcome::SkippedNonPush {
            event_name: "pull_request".to_string()
        }
    );
}

#[tokio::test]
async fn empty_change_set_skips_generation_and_update() {
    let host = host_with_files(vec![
        FileChange {
            filename: "old.rs".to_string(),
            status: FileStatus::Removed,
            patch: None,
        },
        FileChange {
            filename: "moved.rs".to_string(),
            status: FileStatus::Renamed,
            patch: Some("@@ -1 +1 @@".to_string()),
        },
    ]);
    let mut generator = MockContentGenerator::new();
    generator.expect_generate_content().never();

    let report = synchronise(&UpdateConfig::default(), &push_event(), &host, &generator)
        .await
        .expect("empty change set is not an error");

    assert_eq!(report.outcome, Outcome::NoChanges);
    assert_eq!(report.files_considered, 0);
}

#[tokio::test]
async fn sentinel_response_skips_update() {
    let mut host = host_with_files(vec![modified("src/lib.rs", "+fn new_feature() {}")]);
    host.expect_get_content().never();
    host.expect_create_or_update_file_contents().never();

    let mut generator = MockContentGenerator::new();
    generator
        .expect_generate_content()
        .times(1)
        .returning(|_| Ok("NO_UPDATE".to_string()));

    let report = synchronise(&UpdateConfig::default(), &push_event(), &host, &generator)
        .await
        .expect("sentinel response is a successful no-op");

    assert_eq!(report.outcome, Outcome::NoUpdate);
    assert_eq!(report.files_considered, 1);
}

#[tokio::test]
async fn response_containing_sentinel_also_skips_update() {
    let mut host = host_with_files(vec![modified("src/lib.rs", "-// typo\n+// fixed")]);
    host.expect_create_or_update_file_contents().never();

    let mut generator = MockContentGenerator::new();
    generator
        .expect_generate_content()
        .returning(|_| Ok("Only a comment changed.\nNO_UPDATE\n".to_string()));

    let report = synchronise(&UpdateConfig::default(), &push_event(), &host, &generator)
        .await
        .unwrap();
    assert_eq!(report.outcome, Outcome::NoUpdate);
}

#[tokio::test]
async fn rewritten_document_is_committed_once_with_fetched_sha() {
    let new_readme = "# Widgets\n\nNow with `new_feature`. ✨\n";

    let mut host = host_with_files(vec![
        modified("src/lib.rs", "+pub fn new_feature() {}"),
        FileChange {
            filename: "src/feature.rs".to_string(),
            status: FileStatus::Added,
            patch: Some("+// feature".to_string()),
        },
    ]);
    host.expect_get_content()
        .times(1)
        .returning(|owner, repo, path| {
            assert_eq!(owner, "octo");
            assert_eq!(repo, "widgets");
            assert_eq!(path, "README.md");
            Ok(DocumentContent {
                path: path.to_string(),
                sha: "readme-sha-1".to_string(),
            })
        });
    host.expect_create_or_update_file_contents()
        .times(1)
        .returning(move |owner, repo, update| {
            assert_eq!(owner, "octo");
            assert_eq!(repo, "widgets");
            assert_eq!(update.path, "README.md");
            assert_eq!(update.message, "docs: update readme [skip ci]");
            assert_eq!(update.sha, "readme-sha-1");
            assert_eq!(update.content_base64, BASE64.encode(new_readme));
            Ok(CommitResult {
                commit_sha: "commit-9".to_string(),
                content_sha: "readme-sha-2".to_string(),
            })
        });

    let mut generator = MockContentGenerator::new();
    generator
        .expect_generate_content()
        .times(1)
        .returning(move |prompt| {
            assert!(prompt.contains("File: src/lib.rs\nDiff:\n+pub fn new_feature() {}"));
            assert!(prompt.contains("File: src/feature.rs"));
            assert!(prompt.contains("return \"NO_UPDATE\""));
            Ok(new_readme.to_string())
        });

    let report = synchronise(&UpdateConfig::default(), &push_event(), &host, &generator)
        .await
        .expect("update should succeed");

    assert_eq!(report.files_considered, 2);
    assert_eq!(
        report.outcome,
        Outcome::Updated {
            commit: CommitResult {
                commit_sha: "commit-9".to_string(),
                content_sha: "readme-sha-2".to_string(),
            }
        }
    );
}

#[tokio::test]
async fn custom_config_drives_path_message_and_sentinel() {
    let config = UpdateConfig {
        document_path: "docs/OVERVIEW.md".to_string(),
        commit_message: "docs: refresh overview".to_string(),
        sentinel: "NOTHING_TO_DO".to_string(),
        max_diff_bytes: 0,
    };

    let mut host = host_with_files(vec![modified("src/main.rs", "+fn main() {}")]);
    host.expect_get_content().returning(|_, _, path| {
        assert_eq!(path, "docs/OVERVIEW.md");
        Ok(DocumentContent {
            path: path.to_string(),
            sha: "s".to_string(),
        })
    });
    host.expect_create_or_update_file_contents()
        .times(1)
        .returning(|_, _, update| {
            assert_eq!(update.path, "docs/OVERVIEW.md");
            assert_eq!(update.message, "docs: refresh overview");
            Ok(CommitResult {
                commit_sha: "c".to_string(),
                content_sha: "s2".to_string(),
            })
        });

    let mut generator = MockContentGenerator::new();
    generator.expect_generate_content().returning(|prompt| {
        assert!(prompt.contains("return \"NOTHING_TO_DO\""));
        // The default sentinel has no special meaning under this config.
        Ok("NO_UPDATE is mentioned but not the configured marker".to_string())
    });

    let report = synchronise(&config, &push_event(), &host, &generator)
        .await
        .unwrap();
    assert!(matches!(report.outcome, Outcome::Updated { .. }));
}

#[tokio::test]
async fn diff_failure_reports_raw_message_and_stops() {
    let mut host = MockSourceHost::new();
    host.expect_compare_commits()
        .returning(|_, _, _, _| Err("Bad credentials".into()));
    host.expect_get_content().never();
    let mut generator = MockContentGenerator::new();
    generator.expect_generate_content().never();

    let err = synchronise(&UpdateConfig::default(), &push_event(), &host, &generator)
        .await
        .unwrap_err();
    assert_eq!(err, "Bad credentials");
}

#[tokio::test]
async fn generation_failure_reports_raw_message_and_stops() {
    let mut host = host_with_files(vec![modified("a.rs", "+1")]);
    host.expect_get_content().never();
    host.expect_create_or_update_file_contents().never();

    let mut generator = MockContentGenerator::new();
    generator
        .expect_generate_content()
        .returning(|_| Err("API key not valid".into()));

    let err = synchronise(&UpdateConfig::default(), &push_event(), &host, &generator)
        .await
        .unwrap_err();
    assert_eq!(err, "API key not valid");
}

#[tokio::test]
async fn missing_document_fails_before_update() {
    let mut host = host_with_files(vec![modified("a.rs", "+1")]);
    host.expect_get_content()
        .returning(|_, _, _| Err("Not Found".into()));
    host.expect_create_or_update_file_contents().never();

    let mut generator = MockContentGenerator::new();
    generator
        .expect_generate_content()
        .returning(|_| Ok("# New README".to_string()));

    let err = synchronise(&UpdateConfig::default(), &push_event(), &host, &generator)
        .await
        .unwrap_err();
    assert_eq!(err, "Not Found");
}

#[tokio::test]
async fn stale_sha_on_update_is_fatal() {
    let mut host = host_with_files(vec![modified("a.rs", "+1")]);
    host.expect_get_content().returning(|_, _, path| {
        Ok(DocumentContent {
            path: path.to_string(),
            sha: "old".to_string(),
        })
    });
    host.expect_create_or_update_file_contents()
        .times(1)
        .returning(|_, _, _| Err("README.md does not match old".into()));

    let mut generator = MockContentGenerator::new();
    generator
        .expect_generate_content()
        .returning(|_| Ok("# New README".to_string()));

    let err = synchronise(&UpdateConfig::default(), &push_event(), &host, &generator)
        .await
        .unwrap_err();
    assert_eq!(err, "README.md does not match old");
}
