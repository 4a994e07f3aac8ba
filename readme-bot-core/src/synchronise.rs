//! High-level pipeline: orchestrates diff → generate → update for one push.
//!
//! This module brings the README in line with the code changes of a single
//! push. It runs strictly in order:
//!   - Fetches the commit comparison for the push and builds a [`ChangeSet`]
//!   - Sends the rendered prompt to the [`ContentGenerator`]
//!   - Unless the response carries the sentinel, fetches the document's sha
//!     and commits the response as the new document via the [`SourceHost`]
//!
//! # Responsibilities
//! - Fail-fast: the first failing step ends the run, later steps never start
//! - Skips quietly on non-push events, empty change sets and sentinel responses
//! - Logs every step boundary for traceability
//!
//! # Error Handling
//! The error string is the failing collaborator's own message, unchanged.
//! Step context is logged, not prepended.
//!
//! # Navigation
//! - Main entrypoint: [`synchronise`]
//! - Supporting types: [`SynchroniseReport`], [`Outcome`].

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{debug, error, info};

use crate::changeset::ChangeSet;
use crate::config::UpdateConfig;
use crate::contract::{CommitResult, ContentGenerator, FileUpdate, SourceHost};
use crate::event::{PushEvent, TriggerEvent};
use crate::prompt::{build_prompt, is_sentinel_response};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    SkippedNonPush { event_name: String },
    NoChanges,
    NoUpdate,
    Updated { commit: CommitResult },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynchroniseReport {
    pub outcome: Outcome,
    /// Number of files that went into the prompt.
    pub files_considered: usize,
}

pub async fn synchronise<H, G>(
    config: &UpdateConfig,
    event: &TriggerEvent,
    host: &H,
    generator: &G,
) -> Result<SynchroniseReport, String>
where
    H: SourceHost + ?Sized,
    G: ContentGenerator + ?Sized,
{
    let push = match event {
        TriggerEvent::Push(push) => push,
        TriggerEvent::Other { event_name } => {
            info!(event_name = %event_name, "This action only runs on push events. Skipping.");
            return Ok(SynchroniseReport {
                outcome: Outcome::SkippedNonPush {
                    event_name: event_name.clone(),
                },
                files_considered: 0,
            });
        }
    };

    info!(
        repository = %push.repository,
        before = %push.before,
        after = %push.after,
        "[SYNC] Starting README synchronisation"
    );

    // --- Step 1: Diff ---
    let changes = fetch_change_set(host, push).await?;
    if changes.is_empty() {
        info!("[SYNC][DIFF] No added or modified files, nothing to do");
        return Ok(SynchroniseReport {
            outcome: Outcome::NoChanges,
            files_considered: 0,
        });
    }
    let files_considered = changes.len();

    // --- Step 2: Generate ---
    let prompt = build_prompt(&changes, &config.sentinel, config.max_diff_bytes);
    debug!(
        prompt_bytes = prompt.len(),
        files = files_considered,
        "[SYNC][GENERATE] Prompt built"
    );
    let response = match generator.generate_content(&prompt).await {
        Ok(text) => {
            info!(response_bytes = text.len(), "[SYNC][GENERATE] Model responded");
            text
        }
        Err(e) => {
            error!(error = %e, "[SYNC][ERROR][GENERATE] generate_content failed");
            return Err(e.to_string());
        }
    };

    if is_sentinel_response(&response, &config.sentinel) {
        info!(sentinel = %config.sentinel, "[SYNC][GENERATE] Model found no update warranted");
        return Ok(SynchroniseReport {
            outcome: Outcome::NoUpdate,
            files_considered,
        });
    }

    // --- Step 3: Update ---
    let commit = update_document(config, host, push, &response).await?;
    Ok(SynchroniseReport {
        outcome: Outcome::Updated { commit },
        files_considered,
    })
}

async fn fetch_change_set<H>(host: &H, push: &PushEvent) -> Result<ChangeSet, String>
where
    H: SourceHost + ?Sized,
{
    let repo = &push.repository;
    match host
        .compare_commits(&repo.owner, &repo.repo, &push.before, &push.after)
        .await
    {
        Ok(files) => {
            let total = files.len();
            let changes = ChangeSet::from_files(files);
            info!(
                files_total = total,
                files_selected = changes.len(),
                "[SYNC][DIFF] compare_commits succeeded"
            );
            Ok(changes)
        }
        Err(e) => {
            error!(error = %e, "[SYNC][ERROR][DIFF] compare_commits failed");
            Err(e.to_string())
        }
    }
}

async fn update_document<H>(
    config: &UpdateConfig,
    host: &H,
    push: &PushEvent,
    new_content: &str,
) -> Result<CommitResult, String>
where
    H: SourceHost + ?Sized,
{
    let repo = &push.repository;

    let current = match host
        .get_content(&repo.owner, &repo.repo, &config.document_path)
        .await
    {
        Ok(doc) => {
            info!(path = %doc.path, sha = %doc.sha, "[SYNC][UPDATE] get_content succeeded");
            doc
        }
        Err(e) => {
            error!(error = %e, path = %config.document_path, "[SYNC][ERROR][UPDATE] get_content failed");
            return Err(e.to_string());
        }
    };

    let update = FileUpdate {
        path: config.document_path.clone(),
        message: config.commit_message.clone(),
        content_base64: BASE64.encode(new_content),
        sha: current.sha,
    };

    match host
        .create_or_update_file_contents(&repo.owner, &repo.repo, update)
        .await
    {
        Ok(commit) => {
            info!(
                commit_sha = %commit.commit_sha,
                content_sha = %commit.content_sha,
                "[SYNC][UPDATE] Document committed"
            );
            Ok(commit)
        }
        Err(e) => {
            error!(error = %e, path = %config.document_path, "[SYNC][ERROR][UPDATE] create_or_update_file_contents failed");
            Err(e.to_string())
        }
    }
}
