use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::models::{Note, NoteId};
use crate::state::NoteCollection;
use icons::Pencil;
use leptos::prelude::*;
use tw_merge::tw_merge;

/// Inline rename state for the note list. At most one row is edited at a
/// time; the commit is bound to that row's id, not to the selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RenameDraft {
    editing: Option<NoteId>,
    title: String,
}

impl RenameDraft {
    pub fn begin(&mut self, note: &Note) {
        self.editing = Some(note.id);
        self.title = note.title.clone();
    }

    pub fn is_editing(&self, id: NoteId) -> bool {
        self.editing == Some(id)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// Close the editor and hand back the rename to persist.
    pub fn confirm(&mut self) -> Option<(NoteId, String)> {
        let id = self.editing.take()?;
        Some((id, std::mem::take(&mut self.title)))
    }

    pub fn cancel(&mut self) {
        self.editing = None;
        self.title.clear();
    }
}

/// What a keydown in the rename input does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenameKey {
    Confirm,
    Cancel,
    Ignore,
}

impl RenameKey {
    /// Keys that belong to a running composition (the Enter that accepts an
    /// IME conversion, the Escape that abandons it) never reach the rename.
    pub fn classify(key: &str, composing: bool) -> Self {
        if composing {
            return RenameKey::Ignore;
        }
        match key {
            "Enter" => RenameKey::Confirm,
            "Escape" => RenameKey::Cancel,
            _ => RenameKey::Ignore,
        }
    }
}

// Safari reports the keydown that ends a composition with keyCode 229 and
// `isComposing == false`.
const IME_PROCESS_KEY_CODE: u32 = 229;

fn is_composing_key(ev: &web_sys::KeyboardEvent) -> bool {
    ev.is_composing() || ev.key_code() == IME_PROCESS_KEY_CODE
}

#[component]
pub(crate) fn NoteList(
    #[prop(into)] notes: Signal<NoteCollection>,
    #[prop(into)] selected: Signal<Option<NoteId>>,
    on_select: Callback<NoteId>,
    on_rename: Callback<(NoteId, String)>,
) -> impl IntoView {
    let rename: RwSignal<RenameDraft> = RwSignal::new(RenameDraft::default());

    view! {
        <ul class="space-y-2">
            <For
                each=move || notes.with(|n| n.as_slice().to_vec())
                key=|note| (note.id, note.title.clone())
                children=move |note: Note| {
                    let id = note.id;
                    let title = note.title.clone();
                    let rename_from = note.clone();

                    let row_class = move || {
                        let state = if selected.get() == Some(id) { "bg-blue-200" } else { "bg-white" };
                        tw_merge!("flex cursor-pointer items-center justify-between rounded p-2", state)
                    };

                    view! {
                        <li class=row_class on:click=move |_| on_select.run(id)>
                            <Show
                                when=move || rename.with(|r| r.is_editing(id))
                                fallback=move || view! { <span class="truncate">{title.clone()}</span> }
                            >
                                <input
                                    name="title"
                                    class="h-7 min-w-0 flex-1 rounded-md border border-input bg-transparent px-2 text-sm outline-none focus-visible:ring-2 focus-visible:ring-ring/50"
                                    prop:value=move || rename.with(|r| r.title().to_string())
                                    on:input=move |ev: web_sys::Event| {
                                        let v = event_target_value(&ev);
                                        rename.update(|r| r.set_title(v));
                                    }
                                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                                        match RenameKey::classify(&ev.key(), is_composing_key(&ev)) {
                                            RenameKey::Confirm => {
                                                ev.prevent_default();
                                                if let Some((id, title)) = rename.try_update(|r| r.confirm()).flatten() {
                                                    on_rename.run((id, title));
                                                }
                                            }
                                            RenameKey::Cancel => rename.update(|r| r.cancel()),
                                            RenameKey::Ignore => {}
                                        }
                                    }
                                />
                            </Show>
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Icon
                                class="ml-2"
                                attr:title="Rename"
                                on:click=move |_| rename.update(|r| r.begin(&rename_from))
                            >
                                <Pencil class=tw_merge!("size-4", "shrink-0") />
                            </Button>
                        </li>
                    }
                }
            />
        </ul>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: NoteId, title: &str) -> Note {
        Note {
            id,
            title: title.to_string(),
            content: String::new(),
        }
    }

    #[test]
    fn test_begin_seeds_with_row_title() {
        let mut r = RenameDraft::default();
        r.begin(&note(4, "groceries"));
        assert!(r.is_editing(4));
        assert!(!r.is_editing(5));
        assert_eq!(r.title(), "groceries");
    }

    #[test]
    fn test_confirm_targets_edited_row_and_closes() {
        let mut r = RenameDraft::default();
        r.begin(&note(4, "old"));
        r.set_title("new".to_string());
        assert_eq!(r.confirm(), Some((4, "new".to_string())));
        assert!(!r.is_editing(4));
        assert_eq!(r.confirm(), None);
    }

    #[test]
    fn test_only_one_row_editable() {
        let mut r = RenameDraft::default();
        r.begin(&note(1, "one"));
        r.begin(&note(2, "two"));
        assert!(!r.is_editing(1));
        assert!(r.is_editing(2));
        assert_eq!(r.title(), "two");
    }

    #[test]
    fn test_empty_title_is_accepted() {
        let mut r = RenameDraft::default();
        r.begin(&note(1, "one"));
        r.set_title(String::new());
        assert_eq!(r.confirm(), Some((1, String::new())));
    }

    #[test]
    fn test_enter_and_escape_outside_composition() {
        assert_eq!(RenameKey::classify("Enter", false), RenameKey::Confirm);
        assert_eq!(RenameKey::classify("Escape", false), RenameKey::Cancel);
        assert_eq!(RenameKey::classify("a", false), RenameKey::Ignore);
        assert_eq!(RenameKey::classify("Tab", false), RenameKey::Ignore);
    }

    #[test]
    fn test_ime_enter_does_not_commit_half_converted_title() {
        let mut r = RenameDraft::default();
        r.begin(&note(1, "新規ノート"));
        r.set_title("しんき".to_string());

        // Enter that accepts the conversion.
        assert_eq!(RenameKey::classify("Enter", true), RenameKey::Ignore);
        assert_eq!(RenameKey::classify("Escape", true), RenameKey::Ignore);
        assert!(r.is_editing(1));

        r.set_title("新機".to_string());
        assert_eq!(RenameKey::classify("Enter", false), RenameKey::Confirm);
        assert_eq!(r.confirm(), Some((1, "新機".to_string())));
    }

    #[test]
    fn test_cancel_discards_edit() {
        let mut r = RenameDraft::default();
        r.begin(&note(1, "one"));
        r.set_title("typo".to_string());
        r.cancel();
        assert_eq!(r, RenameDraft::default());
        assert_eq!(r.confirm(), None);
    }
}
