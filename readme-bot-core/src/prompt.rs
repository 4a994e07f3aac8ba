//! Prompt construction.
//!
//! The prompt is a fixed instruction block followed by the rendered change
//! set. Oversized change sets are cut to a byte budget before they are
//! embedded, so the request stays within what the model accepts.

use tracing::warn;

use crate::changeset::ChangeSet;

/// Result of fitting rendered diff text into a byte budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedDiff {
    pub text: String,
    pub original_bytes: usize,
    pub truncated: bool,
}

/// Cut `rendered` to at most `max_bytes` on a char boundary and append a
/// marker line. `max_bytes == 0` means unlimited.
pub fn fit_to_budget(rendered: String, max_bytes: usize) -> FittedDiff {
    let original_bytes = rendered.len();
    if max_bytes == 0 || original_bytes <= max_bytes {
        return FittedDiff {
            text: rendered,
            original_bytes,
            truncated: false,
        };
    }

    let mut cut = max_bytes;
    while !rendered.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut text = rendered;
    text.truncate(cut);
    text.push_str(&format!(
        "\n[diff truncated: {} of {} bytes shown]",
        cut, original_bytes
    ));

    warn!(
        shown_bytes = cut,
        original_bytes, "Change set exceeds byte budget, truncating"
    );

    FittedDiff {
        text,
        original_bytes,
        truncated: true,
    }
}

/// Build the model prompt for `changes`.
pub fn build_prompt(changes: &ChangeSet, sentinel: &str, max_diff_bytes: usize) -> String {
    let fitted = fit_to_budget(changes.render(), max_diff_bytes);
    format!(
        "Update the project README based on these code changes.\n\
         If no significant features were added, return \"{}\".\n\
         Changes: {}\n",
        sentinel, fitted.text
    )
}

/// True when the model asked for no update.
pub fn is_sentinel_response(response: &str, sentinel: &str) -> bool {
    response.contains(sentinel)
}
