mod api;
mod attach;
mod clipboard;
mod components;
mod state;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatArea;
use components::sidebar::Sidebar;
use components::toasts::Toasts;
use state::{AppState, RenderKit};

#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();
    RenderKit::provide();

    state.load_conversations();
    state.load_counter();

    view! {
        <div class="app-container">
            <Sidebar />
            <ChatArea />
            <Toasts />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
