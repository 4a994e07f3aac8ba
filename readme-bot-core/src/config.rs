use tracing::{debug, info};

pub const DEFAULT_DOCUMENT_PATH: &str = "README.md";
pub const DEFAULT_COMMIT_MESSAGE: &str = "docs: update readme [skip ci]";
pub const DEFAULT_SENTINEL: &str = "NO_UPDATE";
pub const DEFAULT_MAX_DIFF_BYTES: usize = 100_000;

/// Non-secret settings for one update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateConfig {
    /// Repository path of the document to rewrite.
    pub document_path: String,
    pub commit_message: String,
    /// Marker the model returns when no update is warranted.
    pub sentinel: String,
    /// Byte budget for the rendered change set. `0` disables truncation.
    pub max_diff_bytes: usize,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            document_path: DEFAULT_DOCUMENT_PATH.to_string(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            max_diff_bytes: DEFAULT_MAX_DIFF_BYTES,
        }
    }
}

impl UpdateConfig {
    pub fn trace_loaded(&self) {
        info!(
            document_path = %self.document_path,
            sentinel = %self.sentinel,
            max_diff_bytes = self.max_diff_bytes,
            "Loaded UpdateConfig"
        );
        debug!(?self, "UpdateConfig loaded (full debug)");
    }
}
