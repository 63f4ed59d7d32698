use crate::drafts::DraftSync;
use leptos::prelude::*;
use pulldown_cmark::{html, Event, Options, Parser};
use wasm_bindgen::JsCast;

/// Render a note body as HTML for the preview pane.
///
/// Raw HTML in the source is shown as text, never injected.
pub(crate) fn render_markdown(src: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let events = Parser::new_ext(src, opts).map(|ev| match ev {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(src.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

// `target`, not `current_target`: delegated handlers see the root as the
// current target.
fn textarea_value(ev: &web_sys::Event) -> Option<String> {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlTextAreaElement>().ok())
        .map(|t| t.value())
}

/// Markdown editor bound to one note's content.
///
/// `on_commit` receives every value that should be persisted. While an IME
/// composition is running nothing is committed and upstream changes are
/// held back; see [`DraftSync`].
#[component]
pub(crate) fn NoteEditor(
    #[prop(into)] content: Signal<String>,
    #[prop(into)] preview: Signal<bool>,
    on_commit: Callback<String>,
) -> impl IntoView {
    let sync: RwSignal<DraftSync> = RwSignal::new(DraftSync::new(content.get_untracked()));

    // Bumped when the synchronizer rewrites the draft. The textarea's DOM
    // value is written only then, never in response to the user's own typing.
    let rewrites: RwSignal<u64> = RwSignal::new(0);

    Effect::new(move |_| {
        let value = content.get();
        if sync.try_update(|s| s.absorb(&value)).unwrap_or(false) {
            rewrites.update(|n| *n += 1);
        }
    });

    let preview_html = Memo::new(move |_| sync.with(|s| render_markdown(s.draft())));

    let on_input = move |ev: web_sys::Event| {
        let Some(value) = textarea_value(&ev) else {
            return;
        };
        if let Some(text) = sync.try_update(|s| s.input(value)).flatten() {
            on_commit.run(text);
        }
    };

    let on_composition_start = move |_ev: web_sys::CompositionEvent| {
        sync.update(|s| s.composition_start());
    };

    let on_composition_end = move |ev: web_sys::CompositionEvent| {
        let value = textarea_value(&ev).unwrap_or_else(|| sync.with_untracked(|s| s.draft().to_string()));
        if let Some(text) = sync.try_update(|s| s.composition_end(value)) {
            on_commit.run(text);
        }
    };

    view! {
        <Show
            when=move || preview.get()
            fallback=move || view! {
                <textarea
                    class="h-[500px] w-full rounded border border-gray-300 p-2"
                    prop:value=move || {
                        rewrites.track();
                        sync.with_untracked(|s| s.draft().to_string())
                    }
                    on:input=on_input
                    on:compositionstart=on_composition_start
                    on:compositionend=on_composition_end
                ></textarea>
            }
        >
            <div class="markdown" inner_html=move || preview_html.get()></div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_headings_and_emphasis() {
        let html = render_markdown("# Title\n\nsome *em* and **strong**");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<em>em</em>"));
        assert!(html.contains("<strong>strong</strong>"));
    }

    #[test]
    fn test_render_gfm_extensions() {
        let html = render_markdown("~~gone~~\n\n- [x] done\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("checkbox"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("<script>alert(1)</script>\n\ninline <b>x</b>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_empty_note_renders_nothing() {
        assert_eq!(render_markdown(""), "");
    }
}
