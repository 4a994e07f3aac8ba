//! Trigger event model.
//!
//! Only `push` events carry what the pipeline needs (a commit range and the
//! repository). Every other event class is kept as [`TriggerEvent::Other`] so
//! the pipeline can skip it without touching the payload.

use serde::Deserialize;
use std::fmt;

pub const PUSH_EVENT: &str = "push";

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub owner: String,
    pub repo: String,
}

impl RepoCoordinates {
    /// Parse an `owner/repo` string.
    pub fn parse(full_name: &str) -> Result<Self, EventError> {
        match full_name.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(EventError::InvalidRepository(full_name.to_string())),
        }
    }
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A push: the repository and the commit range it moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    pub repository: RepoCoordinates,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    Push(PushEvent),
    Other { event_name: String },
}

impl TriggerEvent {
    /// Build an event from its class name and, for pushes, the JSON payload.
    ///
    /// `fallback_repository` (`owner/repo`) is used when the payload has no
    /// `repository` object. The payload is not read for non-push events.
    pub fn new(
        event_name: &str,
        payload: Option<&str>,
        fallback_repository: Option<&str>,
    ) -> Result<Self, EventError> {
        if event_name != PUSH_EVENT {
            return Ok(TriggerEvent::Other {
                event_name: event_name.to_string(),
            });
        }
        let payload = payload.ok_or(EventError::MissingPayload)?;
        PushEvent::from_json(payload, fallback_repository).map(TriggerEvent::Push)
    }

    pub fn event_name(&self) -> &str {
        match self {
            TriggerEvent::Push(_) => PUSH_EVENT,
            TriggerEvent::Other { event_name } => event_name,
        }
    }
}

#[derive(Deserialize)]
struct RawPushPayload {
    before: Option<String>,
    after: Option<String>,
    repository: Option<RawRepository>,
}

#[derive(Deserialize)]
struct RawRepository {
    name: String,
    owner: RawOwner,
}

// Push payloads carry `login` for the owner; some carry only `name`.
#[derive(Deserialize)]
struct RawOwner {
    login: Option<String>,
    name: Option<String>,
}

impl PushEvent {
    pub fn from_json(payload: &str, fallback_repository: Option<&str>) -> Result<Self, EventError> {
        let raw: RawPushPayload =
            serde_json::from_str(payload).map_err(|e| EventError::InvalidPayload(e.to_string()))?;

        let before = raw
            .before
            .filter(|s| !s.is_empty())
            .ok_or(EventError::MissingField("before"))?;
        let after = raw
            .after
            .filter(|s| !s.is_empty())
            .ok_or(EventError::MissingField("after"))?;

        let from_payload = raw.repository.and_then(|r| {
            r.owner.login.or(r.owner.name).map(|owner| RepoCoordinates {
                owner,
                repo: r.name,
            })
        });
        let repository = match (from_payload, fallback_repository) {
            (Some(coords), _) => coords,
            (None, Some(full_name)) => RepoCoordinates::parse(full_name)?,
            (None, None) => return Err(EventError::MissingField("repository")),
        };

        Ok(PushEvent {
            repository,
            before,
            after,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum EventError {
    MissingPayload,
    InvalidPayload(String),
    MissingField(&'static str),
    InvalidRepository(String),
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::MissingPayload => write!(f, "Push event payload is missing"),
            EventError::InvalidPayload(e) => write!(f, "Invalid push event payload: {}", e),
            EventError::MissingField(field) => {
                write!(f, "Push event payload has no '{}' field", field)
            }
            EventError::InvalidRepository(s) => {
                write!(f, "Repository must be given as owner/repo, got '{}'", s)
            }
        }
    }
}

impl std::error::Error for EventError {}
