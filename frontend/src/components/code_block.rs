use chatbot_render::SyntaxHighlighter;
use leptos::prelude::*;

use crate::state::{AppState, RenderKit};

/// Highlighted code with a language header and a copy button.
#[component]
pub fn CodeBlock(language: String, code: String) -> impl IntoView {
    let state = expect_context::<AppState>();
    let kit = expect_context::<RenderKit>();
    let highlighted = kit.highlighter.highlight(&language, &code);

    view! {
        <div class="code-block">
            <div class="code-header">
                <span>{language}</span>
                <button class="copy-button" on:click=move |_| state.copy_code(code.clone())>
                    "Copy"
                </button>
            </div>
            <div class="code-body" inner_html=highlighted.html></div>
        </div>
    }
}
