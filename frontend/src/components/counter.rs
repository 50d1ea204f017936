use leptos::prelude::*;

use crate::api::CounterAction;
use crate::state::AppState;

#[component]
pub fn CounterPanel() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <Show when=move || state.counter.get().is_some()>
            <div class="counter-panel">
                <span class="counter-label">"Counter"</span>
                <button on:click=move |_| state.change_counter(CounterAction::Decrement)>"-"</button>
                <span class="counter-value">
                    {move || state.counter.get().unwrap_or_default()}
                </span>
                <button on:click=move |_| state.change_counter(CounterAction::Increment)>"+"</button>
                <button class="counter-reset" on:click=move |_| state.change_counter(CounterAction::Reset)>
                    "Reset"
                </button>
            </div>
        </Show>
    }
}
