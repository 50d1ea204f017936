use leptos::prelude::*;

use crate::state::AppState;

/// Stack of transient notices. Clicking one dismisses it early.
#[component]
pub fn Toasts() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="toast-stack">
            <For each=move || state.notices.get() key=|(id, _)| *id let:item>
                {
                    let (id, notice) = item;
                    view! {
                        <div class=notice.css_class() on:click=move |_| state.dismiss(id)>
                            {notice.text.clone()}
                        </div>
                    }
                }
            </For>
        </div>
    }
}
