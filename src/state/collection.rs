use crate::models::{Note, NoteId};

/// The authoritative note list, always ordered by id descending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    pub fn from_rows(mut rows: Vec<Note>) -> Self {
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Self { notes: rows }
    }

    pub fn as_slice(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Content of the given note, or empty when there is no such note.
    pub fn content_of(&self, id: Option<NoteId>) -> String {
        id.and_then(|id| self.get(id))
            .map(|n| n.content.clone())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn ids(&self) -> Vec<NoteId> {
        self.notes.iter().map(|n| n.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: NoteId, content: &str) -> Note {
        Note {
            id,
            title: format!("n{id}"),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_rows_are_ordered_newest_first() {
        let c = NoteCollection::from_rows(vec![note(3, ""), note(1, ""), note(2, "")]);
        assert_eq!(c.ids(), vec![3, 2, 1]);
    }

    #[test]
    fn test_content_of_missing_selection_is_empty() {
        let c = NoteCollection::from_rows(vec![note(1, "one")]);
        assert_eq!(c.content_of(Some(1)), "one");
        assert_eq!(c.content_of(Some(99)), "");
        assert_eq!(c.content_of(None), "");
    }

    #[test]
    fn test_empty_collection() {
        let c = NoteCollection::default();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
        assert!(c.get(1).is_none());
    }
}
