// Data shapes exchanged with the Gist API. Field names mirror the JSON
// returned by GitHub so serde can map them without renames.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One file inside a gist. The list endpoint omits or truncates
/// `content`, so it is optional here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GistFile {
    pub filename: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub raw_url: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub truncated: bool,
}

impl GistFile {
    /// True when `content` can be used as the full file body.
    pub fn has_full_content(&self) -> bool {
        self.content.is_some() && !self.truncated
    }
}

/// A hosted gist. `files` is keyed by filename; a sorted map makes
/// "first filename" deterministic.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Gist {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub files: BTreeMap<String, GistFile>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Gist {
    /// Filenames in map order.
    pub fn file_names(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    /// Description if non-empty, else the first filename, else "Untitled".
    pub fn label(&self) -> String {
        match self.description.as_deref() {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => self
                .files
                .keys()
                .next()
                .cloned()
                .unwrap_or_else(|| "Untitled".to_string()),
        }
    }

    /// Short summary used next to the label, e.g. `2 file(s) - Secret`.
    pub fn summary(&self) -> String {
        let visibility = if self.public { "Public" } else { "Secret" };
        format!("{} file(s) - {}", self.files.len(), visibility)
    }

    /// Comma separated filenames.
    pub fn detail(&self) -> String {
        self.file_names().join(", ")
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// `{ "content": ... }` entry of a create/update request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub content: String,
}

impl FileContent {
    pub fn new(content: impl Into<String>) -> Self {
        FileContent {
            content: content.into(),
        }
    }
}

/// Body of `POST /gists`.
#[derive(Serialize, Debug)]
pub struct CreateGistRequest<'a> {
    pub description: &'a str,
    pub public: bool,
    pub files: &'a BTreeMap<String, FileContent>,
}

/// Body of `PATCH /gists/{id}`. A `None` file entry serialises to
/// `null`, which asks GitHub to delete that file.
#[derive(Serialize, Debug)]
pub struct UpdateGistRequest<'a> {
    pub description: &'a str,
    pub files: &'a BTreeMap<String, Option<FileContent>>,
}

/// Single-file map for create requests.
pub fn single_file(name: &str, content: &str) -> BTreeMap<String, FileContent> {
    let mut files = BTreeMap::new();
    files.insert(name.to_string(), FileContent::new(content));
    files
}

/// Single-file map for update requests.
pub fn single_file_update(name: &str, content: &str) -> BTreeMap<String, Option<FileContent>> {
    let mut files = BTreeMap::new();
    files.insert(name.to_string(), Some(FileContent::new(content)));
    files
}
