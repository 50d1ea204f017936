use leptos::ev;
use leptos::prelude::*;

use crate::state::AppState;

/// Sidebar showing the conversation list with create and delete actions.
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <aside class="conversation-panel">
            <button class="new-conversation-btn" on:click=move |_| state.new_conversation()>
                "+ New Conversation"
            </button>
            <div class="conversation-list">
                {move || {
                    if state.session.with(|s| s.conversations().is_empty()) {
                        view! {
                            <div class="conversation-empty">"No conversations yet"</div>
                        }.into_any()
                    } else {
                        view! {
                            <For
                                each=move || state.session.with(|s| s.conversations().to_vec())
                                key=|c| c.id.clone()
                                let:conv
                            >
                                {
                                    let label = conv.label();
                                    let id_active = conv.id.clone();
                                    let id_click = conv.id.clone();
                                    let id_delete = conv.id;
                                    view! {
                                        <div
                                            class="conversation-item"
                                            class:active=move || {
                                                state.session.with(|s| s.is_active(&id_active))
                                            }
                                            on:click=move |_| {
                                                state.select_conversation(id_click.clone());
                                            }
                                        >
                                            <span class="conversation-label">{label}</span>
                                            <button
                                                class="delete-conversation-btn"
                                                title="Delete conversation"
                                                on:click=move |ev: ev::MouseEvent| {
                                                    ev.stop_propagation();
                                                    state.delete_conversation(id_delete.clone());
                                                }
                                            >
                                                "✕"
                                            </button>
                                        </div>
                                    }
                                }
                            </For>
                        }.into_any()
                    }
                }}
            </div>
        </aside>
    }
}
