use crate::components::ui::{Button, ButtonVariant};
use crate::config::EnvConfig;
use crate::editor::NoteEditor;
use crate::models::NoteId;
use crate::realtime::RealtimeSubscription;
use crate::sidebar::NoteList;
use crate::state::{AppContext, AppState};
use crate::store::NOTE_TABLE;
use leptos::prelude::*;

#[component]
pub(crate) fn App(config: EnvConfig) -> impl IntoView {
    provide_context(AppContext(AppState::new(config)));

    view! { <NoteWorkspace /> }
}

/// Two-pane layout: note list on the left, editor or preview on the right.
///
/// Notes are fetched on mount and refetched whenever the backend reports an
/// update. The change subscription is released with this view.
#[component]
fn NoteWorkspace() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let shell = app_state.0.shell.clone();

    let notes = shell.notes;
    let selected = shell.selected;
    let preview = shell.preview;
    // Notifies only when the id actually changes.
    let editing = Memo::new(move |_| selected.get());

    shell.spawn_fetch_all();

    let subscription = match RealtimeSubscription::connect(
        &app_state.0.config,
        NOTE_TABLE,
        shell.change_bindings(),
    ) {
        Ok(sub) => Some(sub),
        Err(e) => {
            tracing::error!(error = %e, "Error subscribing to note changes");
            None
        }
    };
    let subscription = StoredValue::new_local(subscription);
    on_cleanup(move || {
        subscription.try_update_value(|s| drop(s.take()));
    });

    let shell = StoredValue::new(shell);

    let on_select = Callback::new(move |id: NoteId| {
        shell.with_value(|s| {
            s.select(id);
        })
    });
    let on_rename = Callback::new(move |(id, title): (NoteId, String)| {
        shell.with_value(|s| s.spawn_update_title(id, title))
    });

    view! {
        <div class="flex h-screen">
            <aside class="w-[300px] shrink-0 bg-gray-100 p-4">
                <div class="mb-4">
                    <Button
                        class="w-full font-bold"
                        on:click=move |_| shell.with_value(|s| s.spawn_create_note())
                    >
                        "新規作成"
                    </Button>
                </div>
                <NoteList notes=notes selected=selected on_select=on_select on_rename=on_rename />
            </aside>

            <main class="min-w-0 flex-1 p-4">
                <div class="mb-4 flex justify-between">
                    <h2 class="text-lg font-bold">"Note Editor"</h2>
                    <Button
                        variant=ButtonVariant::Success
                        class="font-bold"
                        on:click=move |_| shell.with_value(|s| s.toggle_preview())
                    >
                        {move || if preview.get() { "Edit" } else { "Preview" }}
                    </Button>
                </div>

                // One editor instance per selection, so commits always carry
                // the id the draft was loaded from.
                {move || {
                    let id = editing.get();
                    let content = Signal::derive(move || notes.with(|n| n.content_of(id)));
                    let on_commit = Callback::new(move |text: String| match id {
                        Some(id) => shell.with_value(|s| s.spawn_update_content(id, text)),
                        None => tracing::debug!("no note selected; draft not committed"),
                    });
                    view! { <NoteEditor content=content preview=preview on_commit=on_commit /> }
                }}
            </main>
        </div>
    }
}
