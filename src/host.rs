// Capabilities the commands borrow from their host: prompts, text
// views and a few desktop helpers. `ui::TerminalHost` implements them
// with dialoguer/indicatif; tests use a scripted host.
//
// Prompt methods return `Ok(None)` when the user dismisses the prompt.
// That is a normal outcome, not an error.

use crate::error::Result;

/// Stable identifier of an open text view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

/// Snapshot of the focused text view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEditor {
    pub view: ViewId,
    /// Document path, `None` for unsaved documents.
    pub path: Option<String>,
    /// Full document text.
    pub text: String,
    /// Selected text, `None` when nothing is selected.
    pub selection: Option<String>,
}

impl ActiveEditor {
    /// The selected text when a selection exists, else the whole document.
    pub fn selection_or_text(&self) -> &str {
        match self.selection.as_deref() {
            Some(sel) if !sel.is_empty() => sel,
            _ => &self.text,
        }
    }

    /// Last segment of the document path, accepting `/` and `\`.
    pub fn file_name(&self) -> Option<&str> {
        let path = self.path.as_deref()?;
        path.rsplit(['/', '\\']).find(|s| !s.is_empty())
    }
}

/// Content for a new, unsaved view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub gist_id: String,
    pub file_name: String,
    pub content: String,
    pub language: Option<&'static str>,
}

/// One entry of a single-choice list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: Option<String>,
    pub detail: Option<String>,
}

impl PickItem {
    pub fn new(label: impl Into<String>) -> Self {
        PickItem {
            label: label.into(),
            description: None,
            detail: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Free text prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRequest {
    pub prompt: String,
    /// Pre-filled value.
    pub value: Option<String>,
    pub placeholder: Option<String>,
    /// The host keeps asking while the trimmed answer is empty.
    pub required: bool,
    /// Multi-line body (gist content) rather than a single line.
    pub multiline: bool,
}


pub trait Prompts {
    fn input(&mut self, request: &InputRequest) -> Result<Option<String>>;

    /// Index of the chosen item.
    fn pick(&mut self, placeholder: &str, items: &[PickItem]) -> Result<Option<usize>>;

    /// Modal confirmation offering a single `action`.
    fn confirm(&mut self, message: &str, action: &str) -> Result<bool>;

    /// Informational message with optional follow-up actions. Returns the
    /// index of the chosen action.
    fn notify_info(&mut self, message: &str, actions: &[&str]) -> Result<Option<usize>>;

    fn notify_error(&mut self, message: &str);

    /// Show a progress indicator until `end_progress`.
    fn begin_progress(&mut self, title: &str);

    fn end_progress(&mut self);
}

pub trait Workspace {
    fn active_editor(&self) -> Result<Option<ActiveEditor>>;

    fn open_document(&mut self, document: NewDocument) -> Result<ViewId>;
}

pub trait Desktop {
    fn open_external(&mut self, url: &str) -> Result<()>;

    fn write_clipboard(&mut self, text: &str) -> Result<()>;
}

/// Everything a command needs from its surroundings.
pub trait Host: Prompts + Workspace + Desktop {}

impl<T: Prompts + Workspace + Desktop> Host for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(path: Option<&str>, selection: Option<&str>) -> ActiveEditor {
        ActiveEditor {
            view: ViewId(1),
            path: path.map(str::to_string),
            text: "full text".into(),
            selection: selection.map(str::to_string),
        }
    }

    #[test]
    fn file_name_handles_both_separators() {
        assert_eq!(editor(Some("/home/me/src/main.rs"), None).file_name(), Some("main.rs"));
        assert_eq!(editor(Some(r"C:\work\notes.md"), None).file_name(), Some("notes.md"));
        assert_eq!(editor(Some("plain.txt"), None).file_name(), Some("plain.txt"));
        assert_eq!(editor(None, None).file_name(), None);
    }

    #[test]
    fn selection_takes_precedence_when_present() {
        assert_eq!(editor(None, Some("sel")).selection_or_text(), "sel");
        assert_eq!(editor(None, Some("")).selection_or_text(), "full text");
        assert_eq!(editor(None, None).selection_or_text(), "full text");
    }
}
