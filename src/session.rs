// Side table linking open views to the gist file they came from, so
// that "update" can push a view back without asking which gist it is.
// Entries live only as long as the view and are never written to disk.

use crate::host::ViewId;
use std::collections::HashMap;

/// Remote identity of an opened gist file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionMetadata {
    pub gist_id: String,
    pub file_name: String,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct SessionTable {
    entries: HashMap<ViewId, SessionMetadata>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, view: ViewId, metadata: SessionMetadata) {
        self.entries.insert(view, metadata);
    }

    pub fn get(&self, view: ViewId) -> Option<&SessionMetadata> {
        self.entries.get(&view)
    }

    /// Drop the entry of a closed view.
    pub fn detach(&mut self, view: ViewId) -> Option<SessionMetadata> {
        self.entries.remove(&view)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str) -> SessionMetadata {
        SessionMetadata {
            gist_id: id.into(),
            file_name: "a.txt".into(),
            description: String::new(),
        }
    }

    #[test]
    fn attach_replace_and_detach() {
        let mut table = SessionTable::new();
        table.attach(ViewId(1), meta("one"));
        table.attach(ViewId(2), meta("two"));
        table.attach(ViewId(1), meta("uno"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(ViewId(1)).unwrap().gist_id, "uno");

        assert_eq!(table.detach(ViewId(1)).unwrap().gist_id, "uno");
        assert!(table.get(ViewId(1)).is_none());
        assert!(table.detach(ViewId(1)).is_none());
        assert!(!table.is_empty());
    }
}
