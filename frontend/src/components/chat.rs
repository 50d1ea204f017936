use chatbot_render::html::{is_safe_image_src, markdown_html};
use chatbot_render::stats::usage_lines;
use chatbot_render::{CommonMark, Message, Notice, Segment};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;

use crate::components::analysis::SilverAnalysisPanel;
use crate::components::code_block::CodeBlock;
use crate::components::counter::CounterPanel;
use crate::state::{AppState, RenderKit};

/// Main chat area with message history, pending indicator, and input.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let container = NodeRef::<html::Div>::new();

    // Keep the newest message in view.
    Effect::new(move |_| {
        state.session.with(|s| (s.entries().len(), s.is_pending()));
        if let Some(el) = container.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <main class="main-content">
            <h1 class="header">"AI Chatbot"</h1>

            <div
                class="chat-container"
                class:visible=move || state.session.with(|s| !s.entries().is_empty())
                node_ref=container
            >
                <For
                    each=move || state.session.with(|s| s.entries().to_vec())
                    key=|entry| entry.id
                    let:entry
                >
                    <MessageBubble message=entry.message />
                </For>
                <Show when=move || state.session.with(|s| s.is_pending())>
                    <div class="message bot-message loading">"Bot is thinking..."</div>
                </Show>
            </div>

            <ChatInput />

            <div class="action-buttons">
                <button
                    class="reset-button"
                    on:click=move |_| state.reset_chat()
                    disabled=move || state.session.with(|s| s.is_pending())
                >
                    "Reset Chat"
                </button>
                <button
                    class="analysis-button"
                    on:click=move |_| state.load_silver_analysis()
                    disabled=move || state.analysis_loading.get()
                >
                    "Analyze Silver Prices"
                </button>
            </div>

            <SilverAnalysisPanel />
            <CounterPanel />
        </main>
    }
}

/// A single chat message: its segments in order, then the usage footer.
#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let state = expect_context::<AppState>();
    let kit = expect_context::<RenderKit>();
    let css_class = format!("message {}-message", message.role);

    let parts = kit
        .renderer
        .render(&message)
        .into_iter()
        .map(|segment| segment_view(state, segment))
        .collect::<Vec<_>>();

    let stats = usage_lines(&message).map(|lines| {
        let rows = lines.iter().map(|line| view! { <p>{line.to_string()}</p> }).collect::<Vec<_>>();
        view! { <div class="message-stats">{rows}</div> }
    });

    view! {
        <div class=css_class>
            <div class="message-content">{parts}</div>
            {stats}
        </div>
    }
}

fn segment_view(state: AppState, segment: Segment<'_>) -> AnyView {
    match segment {
        Segment::Image(src) if is_safe_image_src(src) => view! {
            <div class="message-image">
                <img src=src.to_string() alt="User uploaded" />
            </div>
        }
        .into_any(),
        Segment::Image(_) => ().into_any(),
        Segment::Markdown(text) => {
            let formatted = markdown_html(&CommonMark, text);
            if formatted.fell_back {
                Effect::new(move |_| state.notify(Notice::formatting_failed()));
            }
            view! { <div class="markdown" inner_html=formatted.html></div> }.into_any()
        }
        Segment::Code { language, code } => {
            view! { <CodeBlock language=language.to_string() code=code.to_string() /> }.into_any()
        }
        Segment::Data { kind, text } => {
            view! { <pre class=kind.css_class()>{text.to_string()}</pre> }.into_any()
        }
    }
}

/// Input row: text, image attachment with preview, and send button.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (input, set_input) = signal(String::new());
    let file_input = NodeRef::<html::Input>::new();

    let is_sending = move || state.session.with(|s| s.is_pending());

    let clear_file = move || {
        if let Some(el) = file_input.get_untracked() {
            el.set_value("");
        }
    };

    let send = move || {
        if is_sending() {
            return;
        }
        if state.send_message(input.get_untracked()) {
            set_input.set(String::new());
            clear_file();
        }
    };

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    let on_file = move |ev: ev::Event| {
        let target: web_sys::HtmlInputElement = event_target(&ev);
        let Some(file) = target.files().and_then(|files| files.get(0)) else {
            return;
        };
        if !file.type_().starts_with("image/") {
            state.notify(Notice::error("Only image files can be attached"));
            target.set_value("");
            return;
        }
        crate::attach::read_as_data_url(&file, move |result| match result {
            Ok(data_url) => state.draft_image.set(Some(data_url)),
            Err(e) => state.notify(Notice::image_read_failed(&e)),
        });
    };

    view! {
        <div class="input-container">
            <textarea
                class="input"
                rows="1"
                placeholder="Type your message..."
                prop:value=input
                on:input=move |ev| set_input.set(event_target_value(&ev))
                on:keydown=on_keydown
            />
            <label class="image-upload-label" title="Attach image">
                <input
                    type="file"
                    accept="image/*"
                    style="display: none"
                    node_ref=file_input
                    on:change=on_file
                />
                "🖼"
            </label>
            <button class="send-button" on:click=move |_| send() disabled=is_sending>
                "Send"
            </button>
        </div>
        {move || {
            state.draft_image.get().map(|url| {
                view! {
                    <div class="image-preview">
                        <img src=url alt="Preview" />
                        <button
                            class="remove-image"
                            on:click=move |_| {
                                state.draft_image.set(None);
                                clear_file();
                            }
                        >
                            "✕"
                        </button>
                    </div>
                }
            })
        }}
    }
}
