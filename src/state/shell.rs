use super::collection::NoteCollection;
use crate::models::{NewNote, NoteId, NotePatch};
use crate::realtime::{ChangeBindings, ChangeKind};
use crate::store::NoteStore;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Owner of the authoritative notes, the selection and the editor mode.
///
/// Every store failure is logged and swallowed here; callers never see an
/// error and the in-memory collection is only replaced by a successful
/// fetch.
#[derive(Clone)]
pub(crate) struct NoteShell<S> {
    store: S,
    pub notes: RwSignal<NoteCollection>,
    pub selected: RwSignal<Option<NoteId>>,
    pub preview: RwSignal<bool>,
}

impl<S: NoteStore> NoteShell<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notes: RwSignal::new(NoteCollection::default()),
            selected: RwSignal::new(None),
            preview: RwSignal::new(false),
        }
    }

    pub async fn fetch_all(&self) {
        match self.store.select_all().await {
            Ok(rows) => {
                let notes = NoteCollection::from_rows(rows);
                tracing::debug!(count = notes.len(), "notes fetched");
                self.notes.set(notes);
            }
            Err(e) => tracing::error!(error = %e, "Error fetching notes"),
        }
    }

    pub async fn create_note(&self) {
        if let Err(e) = self.store.insert(&NewNote::default()).await {
            tracing::error!(error = %e, "Error creating note");
            return;
        }

        self.fetch_all().await;
    }

    pub async fn update_content(&self, id: NoteId, content: String) {
        self.update(id, NotePatch::Content(content)).await;
    }

    pub async fn update_title(&self, id: NoteId, title: String) {
        self.update(id, NotePatch::Title(title)).await;
    }

    // No refetch on success: the subscription brings the row back.
    async fn update(&self, id: NoteId, patch: NotePatch) {
        match self.store.update(id, &patch).await {
            Ok(()) => tracing::debug!(id, field = patch.field(), "note updated"),
            Err(e) => tracing::error!(id, field = patch.field(), error = %e, "Error updating note"),
        }
    }

    /// Select a note. Returns false, without notifying subscribers, when it
    /// is already the selection.
    pub fn select(&self, id: NoteId) -> bool {
        if self.selected.get_untracked() == Some(id) {
            return false;
        }
        self.selected.set(Some(id));
        true
    }

    pub fn toggle_preview(&self) {
        self.preview.update(|p| *p = !*p);
    }

    /// Tracked read of the selected note's content.
    pub fn selected_content(&self) -> String {
        let id = self.selected.get();
        self.notes.with(|n| n.content_of(id))
    }
}

impl<S: NoteStore + Clone + 'static> NoteShell<S> {
    /// Event-to-action table for the `note` change subscription.
    pub fn change_bindings(&self) -> ChangeBindings {
        let shell = self.clone();
        ChangeBindings::new().on(ChangeKind::Update, move || {
            let shell = shell.clone();
            spawn_local(async move { shell.fetch_all().await });
        })
    }

    pub fn spawn_fetch_all(&self) {
        let shell = self.clone();
        spawn_local(async move { shell.fetch_all().await });
    }

    pub fn spawn_create_note(&self) {
        let shell = self.clone();
        spawn_local(async move { shell.create_note().await });
    }

    pub fn spawn_update_content(&self, id: NoteId, content: String) {
        let shell = self.clone();
        spawn_local(async move { shell.update_content(id, content).await });
    }

    pub fn spawn_update_title(&self, id: NoteId, title: String) {
        let shell = self.clone();
        spawn_local(async move { shell.update_title(id, title).await });
    }
}
