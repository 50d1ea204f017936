use std::sync::Arc;

use chatbot_render::models::{ConversationId, SilverAnalysis};
use chatbot_render::{ChatSession, MarkerClassifier, Notice, Outcome, Renderer, Syntect, Ticket};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, CounterAction};
use crate::clipboard;

const NOTICE_MILLIS: u32 = 4_000;

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    pub session: RwSignal<ChatSession>,
    pub draft_image: RwSignal<Option<String>>,
    pub notices: RwSignal<Vec<(u64, Notice)>>,
    pub analysis: RwSignal<Option<SilverAnalysis>>,
    pub analysis_loading: RwSignal<bool>,
    pub counter: RwSignal<Option<i64>>,
    next_notice: StoredValue<u64>,
}

/// Renderer and highlighter shared by every message bubble.
#[derive(Clone)]
pub struct RenderKit {
    pub renderer: Arc<Renderer>,
    pub highlighter: Arc<Syntect>,
}

impl RenderKit {
    pub fn provide() -> Self {
        let kit = Self {
            renderer: Arc::new(Renderer::new().with_classifier(MarkerClassifier::financial())),
            highlighter: Arc::new(Syntect::default()),
        };
        provide_context(kit.clone());
        kit
    }
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let state = Self {
            session: RwSignal::new(ChatSession::new()),
            draft_image: RwSignal::new(None),
            notices: RwSignal::new(Vec::new()),
            analysis: RwSignal::new(None),
            analysis_loading: RwSignal::new(false),
            counter: RwSignal::new(None),
            next_notice: StoredValue::new(0),
        };
        provide_context(state);
        state
    }

    // ── Notifications ─────────────────────────────────────────────────────────

    /// Shows a toast that dismisses itself after a few seconds.
    pub fn notify(&self, notice: Notice) {
        self.next_notice.update_value(|n| *n += 1);
        let id = self.next_notice.get_value();
        self.notices.update(|list| list.push((id, notice)));

        let notices = self.notices;
        Timeout::new(NOTICE_MILLIS, move || {
            notices.update(|list| list.retain(|(i, _)| *i != id));
        })
        .forget();
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|list| list.retain(|(i, _)| *i != id));
    }

    fn report(&self, context: &str, err: impl std::fmt::Display) {
        log::error!("{context}: {err}");
        self.notify(Notice::error(format!("{context}: {err}")));
    }

    // ── Conversations ─────────────────────────────────────────────────────────

    /// Load conversations from the backend.
    pub fn load_conversations(&self) {
        let state = *self;
        spawn_local(async move {
            match api::fetch_conversations().await {
                Ok(list) => {
                    let next = state.session.try_update(|s| s.conversations_loaded(list)).flatten();
                    if let Some((id, ticket)) = next {
                        state.load_history(id, ticket);
                    }
                }
                Err(e) => state.report("Failed to fetch conversations", e),
            }
        });
    }

    fn load_history(&self, id: ConversationId, ticket: Ticket) {
        let state = *self;
        spawn_local(async move {
            match api::fetch_chat_history(&id).await {
                Ok(messages) => {
                    let outcome = state.session.try_update(|s| s.history_loaded(ticket, messages));
                    if outcome == Some(Outcome::Discarded) {
                        log::debug!("Ignored history of conversation {id}");
                    }
                }
                Err(e) => state.report("Failed to fetch chat history", e),
            }
        });
    }

    /// Select a conversation and load its messages.
    pub fn select_conversation(&self, id: ConversationId) {
        if let Some(ticket) = self.session.try_update(|s| s.select(id.clone())) {
            self.load_history(id, ticket);
        }
    }

    pub fn new_conversation(&self) {
        let state = *self;
        spawn_local(async move {
            match api::create_conversation().await {
                Ok(conversation) => {
                    state.session.update(|s| {
                        s.conversation_created(conversation);
                    });
                }
                Err(e) => state.report("Failed to create conversation", e),
            }
        });
    }

    pub fn delete_conversation(&self, id: ConversationId) {
        let state = *self;
        spawn_local(async move {
            match api::delete_conversation(&id).await {
                Ok(()) => {
                    let next = state.session.try_update(|s| s.conversation_deleted(&id)).flatten();
                    if let Some((next_id, ticket)) = next {
                        state.load_history(next_id, ticket);
                    }
                }
                Err(e) => state.report("Failed to delete conversation", e),
            }
        });
    }

    // ── Chat ──────────────────────────────────────────────────────────────────

    /// Appends the user message and posts it. Returns `false` if the session
    /// refused the send (empty input, or a reply still pending).
    pub fn send_message(&self, text: String) -> bool {
        let image = self.draft_image.get_untracked();
        let pending = match self.session.try_update(|s| s.begin_send(&text, image)) {
            Some(Ok(pending)) => pending,
            Some(Err(e)) => {
                if !e.is_validation() {
                    self.notify(Notice::info(e.to_string()));
                }
                return false;
            }
            None => return false,
        };
        self.draft_image.set(None);

        let state = *self;
        spawn_local(async move {
            let result = api::send_chat(&pending.request).await;
            let outcome = state.session.try_update(|s| match result {
                Ok(reply) => s.reply_received(pending.ticket, reply),
                Err(e) => {
                    log::error!("Chat request failed: {e}");
                    s.send_failed(pending.ticket, &e.to_string())
                }
            });
            if outcome == Some(Outcome::Discarded) {
                log::debug!("Ignored a reply for a conversation that is no longer shown");
            }
        });
        true
    }

    pub fn reset_chat(&self) {
        let state = *self;
        let ticket = self.session.with_untracked(|s| s.begin_reset());
        spawn_local(async move {
            match api::reset_chat_history().await {
                Ok(()) => {
                    if state.session.try_update(|s| s.reset_completed(ticket)) == Some(Outcome::Applied) {
                        state.notify(Notice::success("Chat history reset successfully"));
                    }
                }
                Err(e) => state.report("Error resetting chat history", e),
            }
        });
    }

    /// Copies a code block and reports the outcome either way.
    pub fn copy_code(&self, code: String) {
        let state = *self;
        spawn_local(async move {
            let result = clipboard::write_text(&code).await;
            if let Err(e) = &result {
                log::warn!("Failed to copy: {e}");
            }
            state.notify(Notice::copy_result(&result));
        });
    }

    // ── Side panels ───────────────────────────────────────────────────────────

    pub fn load_silver_analysis(&self) {
        let state = *self;
        self.analysis_loading.set(true);
        spawn_local(async move {
            match api::fetch_silver_analysis().await {
                Ok(analysis) => state.analysis.set(Some(analysis)),
                Err(e) => {
                    log::error!("Error fetching silver analysis: {e}");
                    state.notify(Notice::error("Failed to fetch silver analysis. Please try again."));
                }
            }
            state.analysis_loading.set(false);
        });
    }

    pub fn load_counter(&self) {
        let state = *self;
        spawn_local(async move {
            match api::fetch_counter().await {
                Ok(counter) => state.counter.set(Some(counter.value)),
                Err(e) => log::warn!("Counter unavailable: {e}"),
            }
        });
    }

    pub fn change_counter(&self, action: CounterAction) {
        let state = *self;
        spawn_local(async move {
            match api::update_counter(action).await {
                Ok(counter) => state.counter.set(Some(counter.value)),
                Err(e) => state.report("Failed to update counter", e),
            }
        });
    }
}
