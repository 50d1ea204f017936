//! Chat view-model: conversation list, displayed messages, and the pending
//! request. Every asynchronous result is matched against a [`Ticket`] so a
//! reply that arrives after the user switched views is dropped.

use std::mem;

use tracing::debug;

use crate::errors::SessionError;
use crate::models::{ChatRequest, Conversation, ConversationId, Message};

/// Issued when an async operation starts; valid until the view changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    /// Unique within the session; stable key for list rendering.
    pub id: u64,
    pub message: Message,
}

/// A send accepted by [`ChatSession::begin_send`]: post `request`, then report
/// back with `ticket`.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub ticket: Ticket,
    pub request: ChatRequest,
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    conversations: Vec<Conversation>,
    active: Option<ConversationId>,
    entries: Vec<ChatEntry>,
    pending: Option<Ticket>,
    epoch: u64,
    next_entry_id: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active(&self) -> Option<&ConversationId> {
        self.active.as_ref()
    }

    pub fn is_active(&self, id: &ConversationId) -> bool {
        self.active.as_ref() == Some(id)
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Drives the "Bot is thinking..." indicator.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket for an operation that must not outlive the current view.
    pub fn ticket(&self) -> Ticket {
        Ticket { epoch: self.epoch }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.epoch == self.epoch
    }

    /// Starts a new view: later results for the old one are discarded.
    fn advance(&mut self) -> Ticket {
        self.epoch += 1;
        self.pending = None;
        self.ticket()
    }

    fn push(&mut self, message: Message) {
        self.next_entry_id += 1;
        self.entries.push(ChatEntry { id: self.next_entry_id, message });
    }

    // ── Conversations ─────────────────────────────────────────────────────────

    /// Replaces the list. Activates the first conversation when nothing valid
    /// is active; the returned ticket is for fetching its history.
    pub fn conversations_loaded(
        &mut self,
        conversations: Vec<Conversation>,
    ) -> Option<(ConversationId, Ticket)> {
        self.conversations = conversations;

        if let Some(active) = &self.active {
            if self.conversations.iter().any(|c| &c.id == active) {
                return None;
            }
        }

        match self.conversations.first().map(|c| c.id.clone()) {
            Some(first) => Some((first.clone(), self.select(first))),
            None => {
                if self.active.is_some() {
                    self.deactivate();
                }
                None
            }
        }
    }

    /// Switches to `id` with an empty view; fetch its history with the ticket.
    pub fn select(&mut self, id: ConversationId) -> Ticket {
        debug!("Activating conversation {id}");
        let ticket = self.advance();
        self.active = Some(id);
        self.entries.clear();
        ticket
    }

    pub fn conversation_created(&mut self, conversation: Conversation) -> Ticket {
        let id = conversation.id.clone();
        if !self.conversations.iter().any(|c| c.id == id) {
            self.conversations.push(conversation);
        }
        self.select(id)
    }

    /// Removes `id`. If it was active, the first remaining conversation is
    /// activated and returned with a history ticket.
    pub fn conversation_deleted(&mut self, id: &ConversationId) -> Option<(ConversationId, Ticket)> {
        self.conversations.retain(|c| &c.id != id);
        if !self.is_active(id) {
            return None;
        }
        match self.conversations.first().map(|c| c.id.clone()) {
            Some(next) => Some((next.clone(), self.select(next))),
            None => {
                self.deactivate();
                None
            }
        }
    }

    fn deactivate(&mut self) {
        self.advance();
        self.active = None;
        self.entries.clear();
    }

    /// History goes before anything sent locally while it was loading. Local
    /// messages the backend already stored (the history ends with them) are
    /// not repeated.
    pub fn history_loaded(&mut self, ticket: Ticket, history: Vec<Message>) -> Outcome {
        if !self.is_current(ticket) {
            debug!("Discarding history for a view that is no longer shown");
            return Outcome::Discarded;
        }
        let local = mem::take(&mut self.entries);
        let overlap = stored_overlap(&history, &local);
        if overlap > 0 {
            debug!("Dropping {overlap} local message(s) already present in history");
        }
        for message in history {
            self.push(message);
        }
        self.entries.extend(local.into_iter().skip(overlap));
        Outcome::Applied
    }

    // ── Sending ───────────────────────────────────────────────────────────────

    /// Appends the user's message right away and marks the view pending.
    pub fn begin_send(
        &mut self,
        text: &str,
        image: Option<String>,
    ) -> Result<PendingSend, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::RequestPending);
        }
        let image = image.filter(|data| !data.is_empty());
        if text.trim().is_empty() && image.is_none() {
            return Err(SessionError::EmptyField { field_name: "message".to_string() });
        }

        self.push(Message::user(text, image.clone()));
        let ticket = self.ticket();
        self.pending = Some(ticket);

        Ok(PendingSend {
            ticket,
            request: ChatRequest {
                message: text.to_string(),
                image_data: image,
                conversation_id: self.active.clone(),
            },
        })
    }

    pub fn reply_received(&mut self, ticket: Ticket, reply: Message) -> Outcome {
        self.settle(ticket, reply)
    }

    /// The failure is shown inline as an assistant message.
    pub fn send_failed(&mut self, ticket: Ticket, error: &str) -> Outcome {
        self.settle(ticket, Message::assistant(format!("Error: {error}")))
    }

    fn settle(&mut self, ticket: Ticket, message: Message) -> Outcome {
        if !self.is_current(ticket) || self.pending != Some(ticket) {
            debug!("Discarding a reply for a view that is no longer shown");
            return Outcome::Discarded;
        }
        self.pending = None;
        self.push(message);
        Outcome::Applied
    }

    // ── Reset ─────────────────────────────────────────────────────────────────

    pub fn begin_reset(&self) -> Ticket {
        self.ticket()
    }

    /// Clears the view. A reply still in flight from before the reset is
    /// discarded when it lands.
    pub fn reset_completed(&mut self, ticket: Ticket) -> Outcome {
        if !self.is_current(ticket) {
            return Outcome::Discarded;
        }
        self.advance();
        self.entries.clear();
        Outcome::Applied
    }
}

/// Length of the longest run of leading `local` entries that equals the tail
/// of `history`, compared by role and content.
fn stored_overlap(history: &[Message], local: &[ChatEntry]) -> usize {
    (1..=history.len().min(local.len()))
        .rev()
        .find(|&len| {
            history[history.len() - len..]
                .iter()
                .zip(&local[..len])
                .all(|(stored, entry)| {
                    stored.role == entry.message.role && stored.content == entry.message.content
                })
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use pretty_assertions::assert_eq;

    fn conv(id: &str) -> Conversation {
        Conversation { id: ConversationId::new(id), name: None }
    }

    fn roles(session: &ChatSession) -> Vec<(Role, String)> {
        session.entries().iter().map(|e| (e.message.role, e.message.content.clone())).collect()
    }

    #[test]
    fn user_message_precedes_reply() {
        let mut session = ChatSession::new();
        let send = session.begin_send("hello", None).unwrap();
        assert!(session.is_pending());
        assert_eq!(roles(&session), vec![(Role::User, "hello".into())]);

        assert_eq!(session.reply_received(send.ticket, Message::assistant("hi!")), Outcome::Applied);
        assert!(!session.is_pending());
        assert_eq!(
            roles(&session),
            vec![(Role::User, "hello".into()), (Role::Assistant, "hi!".into())]
        );
    }

    #[test]
    fn second_send_while_pending_is_rejected() {
        let mut session = ChatSession::new();
        session.begin_send("one", None).unwrap();
        assert_eq!(session.begin_send("two", None).unwrap_err(), SessionError::RequestPending);
        assert_eq!(session.entries().len(), 1);
    }

    #[test]
    fn empty_message_without_image_is_rejected() {
        let mut session = ChatSession::new();
        let err = session.begin_send("   ", Some(String::new())).unwrap_err();
        assert!(err.is_validation());
        assert!(session.entries().is_empty());

        let send = session.begin_send("", Some("data:image/png;base64,AA".into())).unwrap();
        assert_eq!(send.request.image_data.as_deref(), Some("data:image/png;base64,AA"));
    }

    #[test]
    fn request_targets_active_conversation() {
        let mut session = ChatSession::new();
        session.select(ConversationId::new("4"));
        let send = session.begin_send("q", None).unwrap();
        assert_eq!(send.request.conversation_id, Some(ConversationId::new("4")));
    }

    #[test]
    fn late_reply_after_switch_is_discarded() {
        let mut session = ChatSession::new();
        session.conversations_loaded(vec![conv("1"), conv("2")]);
        let send = session.begin_send("question", None).unwrap();

        let history_ticket = session.select(ConversationId::new("2"));
        assert!(!session.is_pending());

        assert_eq!(
            session.reply_received(send.ticket, Message::assistant("answer for 1")),
            Outcome::Discarded
        );
        assert!(session.entries().is_empty());

        assert_eq!(
            session.history_loaded(history_ticket, vec![Message::assistant("from 2")]),
            Outcome::Applied
        );
        assert_eq!(roles(&session), vec![(Role::Assistant, "from 2".into())]);
    }

    #[test]
    fn stale_history_is_discarded() {
        let mut session = ChatSession::new();
        let first = session.select(ConversationId::new("1"));
        session.select(ConversationId::new("2"));
        assert_eq!(session.history_loaded(first, vec![Message::assistant("old")]), Outcome::Discarded);
        assert!(session.entries().is_empty());
    }

    #[test]
    fn history_goes_before_local_sends() {
        let mut session = ChatSession::new();
        let ticket = session.select(ConversationId::new("1"));
        session.begin_send("typed early", None).unwrap();
        let outcome = session.history_loaded(ticket, vec![Message::user("older", None)]);
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(
            roles(&session),
            vec![(Role::User, "older".into()), (Role::User, "typed early".into())]
        );
        assert!(session.is_pending());
    }

    #[test]
    fn send_already_stored_by_backend_is_not_repeated() {
        let mut session = ChatSession::new();
        let ticket = session.select(ConversationId::new("1"));
        let send = session.begin_send("typed early", None).unwrap();

        let history = vec![Message::assistant("welcome"), Message::user("typed early", None)];
        assert_eq!(session.history_loaded(ticket, history), Outcome::Applied);
        assert_eq!(
            roles(&session),
            vec![(Role::Assistant, "welcome".into()), (Role::User, "typed early".into())]
        );

        assert_eq!(session.reply_received(send.ticket, Message::assistant("sure")), Outcome::Applied);
        assert_eq!(session.entries().len(), 3);
    }

    #[test]
    fn same_text_earlier_in_history_is_kept() {
        let mut session = ChatSession::new();
        let ticket = session.select(ConversationId::new("1"));
        session.begin_send("again", None).unwrap();

        let history = vec![Message::user("again", None), Message::assistant("answer")];
        assert_eq!(session.history_loaded(ticket, history), Outcome::Applied);
        assert_eq!(
            roles(&session),
            vec![
                (Role::User, "again".into()),
                (Role::Assistant, "answer".into()),
                (Role::User, "again".into()),
            ]
        );
    }

    #[test]
    fn failure_is_shown_inline() {
        let mut session = ChatSession::new();
        let send = session.begin_send("x", None).unwrap();
        assert_eq!(session.send_failed(send.ticket, "HTTP error! status: 500"), Outcome::Applied);
        assert_eq!(
            session.entries().last().map(|e| e.message.content.as_str()),
            Some("Error: HTTP error! status: 500")
        );
        assert!(!session.is_pending());
    }

    #[test]
    fn loading_conversations_activates_first() {
        let mut session = ChatSession::new();
        let (id, _ticket) = session.conversations_loaded(vec![conv("9"), conv("3")]).unwrap();
        assert_eq!(id, ConversationId::new("9"));
        assert!(session.is_active(&id));

        // Reloading keeps a still-valid selection.
        session.select(ConversationId::new("3"));
        assert_eq!(session.conversations_loaded(vec![conv("9"), conv("3")]), None);
        assert!(session.is_active(&ConversationId::new("3")));
    }

    #[test]
    fn deleting_active_conversation_moves_to_first_remaining() {
        let mut session = ChatSession::new();
        session.conversations_loaded(vec![conv("1"), conv("2"), conv("3")]);
        session.select(ConversationId::new("2"));

        let (next, _) = session.conversation_deleted(&ConversationId::new("2")).unwrap();
        assert_eq!(next, ConversationId::new("1"));
        assert_eq!(session.conversations().len(), 2);

        assert_eq!(session.conversation_deleted(&ConversationId::new("3")), None);
        assert!(session.is_active(&ConversationId::new("1")));

        assert_eq!(session.conversation_deleted(&ConversationId::new("1")), None);
        assert_eq!(session.active(), None);
    }

    #[test]
    fn created_conversation_becomes_active_and_empty() {
        let mut session = ChatSession::new();
        session.begin_send("hi", None).unwrap();
        session.conversation_created(conv("5"));
        assert!(session.is_active(&ConversationId::new("5")));
        assert!(session.entries().is_empty());
        assert!(!session.is_pending());
        assert_eq!(session.conversations().len(), 1);
    }

    #[test]
    fn reset_clears_and_discards_in_flight_reply() {
        let mut session = ChatSession::new();
        let send = session.begin_send("hi", None).unwrap();
        let reset = session.begin_reset();
        assert_eq!(session.reset_completed(reset), Outcome::Applied);
        assert!(session.entries().is_empty());
        assert_eq!(session.reply_received(send.ticket, Message::assistant("late")), Outcome::Discarded);
    }

    #[test]
    fn entry_ids_are_unique() {
        let mut session = ChatSession::new();
        let ticket = session.select(ConversationId::new("1"));
        let _ = session.history_loaded(ticket, vec![Message::assistant("a"), Message::assistant("b")]);
        let ticket = session.select(ConversationId::new("1"));
        let _ = session.history_loaded(ticket, vec![Message::assistant("a")]);
        let send = session.begin_send("c", None).unwrap();
        let _ = session.reply_received(send.ticket, Message::assistant("d"));
        let mut ids: Vec<_> = session.entries().iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
