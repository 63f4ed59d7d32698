use serde::{Deserialize, Serialize};

/// Title given to rows created by the "new note" action.
pub(crate) const DEFAULT_NOTE_TITLE: &str = "新規ノート";

/// Server-assigned primary key of the `note` table.
pub(crate) type NoteId = i64;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Insert payload. The id is left to the database.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct NewNote {
    pub title: String,
    pub content: String,
}

impl Default for NewNote {
    fn default() -> Self {
        Self {
            title: DEFAULT_NOTE_TITLE.to_string(),
            content: String::new(),
        }
    }
}

/// Single-field update keyed by note id.
///
/// Serializes as `{"title": ..}` or `{"content": ..}` so only the touched
/// column is written.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum NotePatch {
    Title(String),
    Content(String),
}

impl NotePatch {
    pub fn field(&self) -> &'static str {
        match self {
            NotePatch::Title(_) => "title",
            NotePatch::Content(_) => "content",
        }
    }

    #[cfg(test)]
    pub fn apply(&self, note: &mut Note) {
        match self {
            NotePatch::Title(t) => note.title = t.clone(),
            NotePatch::Content(c) => note.content = c.clone(),
        }
    }
}
