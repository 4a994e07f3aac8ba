use crate::contract::FileChange;

/// A single file's contribution to the change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub filename: String,
    pub patch: String,
}

/// Added and modified files from a commit comparison, in API order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub entries: Vec<ChangeEntry>,
}

impl ChangeSet {
    pub fn from_files(files: Vec<FileChange>) -> Self {
        let entries = files
            .into_iter()
            .filter(|f| f.status.is_selected())
            .map(|f| ChangeEntry {
                filename: f.filename,
                patch: f.patch.unwrap_or_default(),
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `File: <name>\nDiff:\n<patch>` per entry, separated by a blank line.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("File: {}\nDiff:\n{}", e.filename, e.patch))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
