use super::{NoteStore, StoreError, StoreResult};
use crate::models::{NewNote, Note, NoteId, NotePatch};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Table {
    rows: Vec<Note>,
    next_id: NoteId,
    failing: bool,
    calls: Vec<String>,
}

/// In-process `note` table with monotonic ids and switchable failure.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    table: Arc<Mutex<Table>>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<Note>) -> Self {
        let next_id = rows.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        let store = Self::default();
        {
            let mut t = store.table.lock().unwrap();
            t.rows = rows;
            t.next_id = next_id;
        }
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.table.lock().unwrap().failing = failing;
    }

    pub fn row(&self, id: NoteId) -> Option<Note> {
        self.table.lock().unwrap().rows.iter().find(|n| n.id == id).cloned()
    }

    /// Operation log, e.g. `["select", "update 3 content"]`.
    pub fn calls(&self) -> Vec<String> {
        self.table.lock().unwrap().calls.clone()
    }

    fn begin(&self, call: String) -> StoreResult<std::sync::MutexGuard<'_, Table>> {
        let mut t = self.table.lock().unwrap();
        t.calls.push(call);
        if t.failing {
            return Err(StoreError::Network("connection refused".to_string()));
        }
        Ok(t)
    }
}

impl NoteStore for MemoryStore {
    async fn select_all(&self) -> StoreResult<Vec<Note>> {
        let t = self.begin("select".to_string())?;
        let mut rows = t.rows.clone();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn insert(&self, note: &NewNote) -> StoreResult<()> {
        let mut t = self.begin("insert".to_string())?;
        let id = t.next_id.max(1);
        t.next_id = id + 1;
        t.rows.push(Note {
            id,
            title: note.title.clone(),
            content: note.content.clone(),
        });
        Ok(())
    }

    async fn update(&self, id: NoteId, patch: &NotePatch) -> StoreResult<()> {
        let mut t = self.begin(format!("update {} {}", id, patch.field()))?;
        // PostgREST reports success for a filter that matches no rows.
        if let Some(row) = t.rows.iter_mut().find(|n| n.id == id) {
            patch.apply(row);
        }
        Ok(())
    }
}
