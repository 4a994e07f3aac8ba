/// `load_config` module: merges the optional YAML settings file with the two secrets
/// into the configuration for one run.
///
/// # Responsibilities
/// - Validate that both secrets are present before anything else happens
/// - Parse the optional YAML file (no secrets in it) and apply defaults
/// - Reject settings that would make the pipeline misbehave (empty sentinel or path)
///
/// # Errors
/// All errors use `anyhow::Error` and surface at the CLI boundary.
use anyhow::{bail, Result};
use readme_bot_core::config::UpdateConfig;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::gemini::DEFAULT_MODEL;

pub const MISSING_SECRETS_MESSAGE: &str = "Missing API Key or GitHub Token.";

/// Settings file schema. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub document_path: Option<String>,
    pub commit_message: Option<String>,
    pub sentinel: Option<String>,
    pub max_diff_bytes: Option<usize>,
    pub model: Option<String>,
}

pub struct Secrets {
    pub gemini_api_key: String,
    pub github_token: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("gemini_api_key", &"<redacted>")
            .field("github_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub struct CliConfig {
    pub update: UpdateConfig,
    pub model: String,
    pub secrets: Secrets,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Check both secrets. Empty values count as missing.
pub fn require_secrets(
    gemini_api_key: Option<String>,
    github_token: Option<String>,
) -> Result<Secrets> {
    match (non_empty(gemini_api_key), non_empty(github_token)) {
        (Some(gemini_api_key), Some(github_token)) => {
            info!("Gemini API key and GitHub token present");
            Ok(Secrets {
                gemini_api_key,
                github_token,
            })
        }
        (key, token) => {
            error!(
                gemini_api_key_set = key.is_some(),
                github_token_set = token.is_some(),
                "Required secret missing"
            );
            bail!(MISSING_SECRETS_MESSAGE)
        }
    }
}

pub fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    info!(config_path = ?path, "Loading configuration from file");

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path,
                e
            ));
        }
    };

    // An empty file is a valid "all defaults" config.
    if content.trim().is_empty() {
        return Ok(SettingsFile::default());
    }

    match serde_yaml::from_str(&content) {
        Ok(settings) => {
            info!(config_path = ?path, "Parsed config YAML successfully");
            Ok(settings)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}

/// Secrets first, then the optional settings file, then validation.
pub fn load_config(
    path: Option<&Path>,
    gemini_api_key: Option<String>,
    github_token: Option<String>,
) -> Result<CliConfig> {
    let secrets = require_secrets(gemini_api_key, github_token)?;

    let settings = match path {
        Some(path) => read_settings_file(path)?,
        None => SettingsFile::default(),
    };

    let defaults = UpdateConfig::default();
    let update = UpdateConfig {
        document_path: settings.document_path.unwrap_or(defaults.document_path),
        commit_message: settings.commit_message.unwrap_or(defaults.commit_message),
        sentinel: settings.sentinel.unwrap_or(defaults.sentinel),
        max_diff_bytes: settings.max_diff_bytes.unwrap_or(defaults.max_diff_bytes),
    };

    if update.sentinel.trim().is_empty() {
        bail!("sentinel must not be empty");
    }
    if update.document_path.trim_matches('/').is_empty() {
        bail!("document_path must not be empty");
    }
    if update.commit_message.trim().is_empty() {
        bail!("commit_message must not be empty");
    }

    let model = settings.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

    info!(
        document_path = %update.document_path,
        model = %model,
        "Config loaded and merged successfully"
    );

    Ok(CliConfig {
        update,
        model,
        secrets,
    })
}
