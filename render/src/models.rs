use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token and cost figures reported by the backend for one generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub tokens_prompt: Option<u64>,
    #[serde(default)]
    pub tokens_completion: Option<u64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
}

impl Usage {
    pub fn is_empty(&self) -> bool {
        self.tokens_prompt.is_none() && self.tokens_completion.is_none() && self.total_cost.is_none()
    }
}

/// One chat message as displayed. Built per render pass and replaced, never
/// edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl Message {
    pub fn user(content: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            image_url: image_url.filter(|url| !url.is_empty()),
            usage: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), image_url: None, usage: None }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = (!usage.is_empty()).then_some(usage);
        self
    }
}

/// Opaque conversation identifier. The backend hands out integers, but
/// nothing on this side relies on that.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ConversationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Round-trip numeric ids as numbers so the backend sees what it sent.
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for ConversationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default)]
    pub name: Option<String>,
}

impl Conversation {
    /// Sidebar label: the name, or a generic label built from the id.
    pub fn label(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Conversation {}", self.id),
        }
    }
}

// ── Backend DTOs ─────────────────────────────────────────────────────────────

/// Row returned by `GET /api/chat_history/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tokens_prompt: Option<u64>,
    #[serde(default)]
    pub tokens_completion: Option<u64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub image_data: Option<String>,
}

impl From<HistoryEntry> for Message {
    fn from(entry: HistoryEntry) -> Self {
        let usage = Usage {
            tokens_prompt: entry.tokens_prompt,
            tokens_completion: entry.tokens_completion,
            total_cost: entry.total_cost,
        };
        Message {
            role: entry.role,
            content: entry.content,
            image_url: entry.image_data.filter(|data| !data.is_empty()),
            usage: None,
        }
        .with_usage(usage)
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    pub conversation_id: Option<ConversationId>,
}

/// Successful answer of `POST /api/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(default)]
    pub generation_stats: Option<Usage>,
}

impl ChatReply {
    pub fn into_message(self) -> Message {
        let usage = self.generation_stats.unwrap_or_default();
        Message::assistant(self.message).with_usage(usage)
    }
}

/// `{"error": "..."}` payload the backend attaches to failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `{"status": "success" | "error", "message": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusBody {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusBody {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistogramData {
    #[serde(default)]
    pub bin_edges: Vec<f64>,
    #[serde(default)]
    pub counts: Vec<u64>,
    #[serde(default)]
    pub today_change: f64,
}

/// Answer of `GET /api/silver_analysis`. All numbers are computed server side.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SilverAnalysis {
    pub today_change: f64,
    pub percentile: f64,
    pub histogram_data: HistogramData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn conversation_id_accepts_numbers_and_strings() {
        let numeric: Conversation = serde_json::from_str(r#"{"id": 7, "name": null}"#).unwrap();
        let text: Conversation = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(numeric.id.as_str(), "7");
        assert_eq!(text.id.as_str(), "abc");
    }

    #[test]
    fn numeric_conversation_id_serializes_as_number() {
        let request = ChatRequest {
            message: "hi".into(),
            image_data: None,
            conversation_id: Some(ConversationId::new("12")),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"message": "hi", "conversation_id": 12}));
    }

    #[test]
    fn conversation_label_falls_back_to_id() {
        let named = Conversation { id: ConversationId::new("1"), name: Some("Rust".into()) };
        let blank = Conversation { id: ConversationId::new("2"), name: Some("  ".into()) };
        assert_eq!(named.label(), "Rust");
        assert_eq!(blank.label(), "Conversation 2");
    }

    #[test]
    fn history_entry_maps_image_and_usage() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"role":"assistant","content":"ok","tokens_prompt":10,"tokens_completion":4,"total_cost":null,"image_data":""}"#,
        )
        .unwrap();
        let message = Message::from(entry);
        assert_eq!(message.image_url, None);
        assert_eq!(
            message.usage,
            Some(Usage { tokens_prompt: Some(10), tokens_completion: Some(4), total_cost: None })
        );
    }

    #[test]
    fn history_entry_without_usage_has_none() {
        let entry: HistoryEntry =
            serde_json::from_str(r#"{"role":"user","content":"hello","image_data":"data:image/png;base64,AA"}"#)
                .unwrap();
        let message = Message::from(entry);
        assert_eq!(message.usage, None);
        assert_eq!(message.image_url.as_deref(), Some("data:image/png;base64,AA"));
    }

    #[test]
    fn chat_reply_becomes_assistant_message() {
        let reply: ChatReply = serde_json::from_str(
            r#"{"message":"hi there","generation_stats":{"tokens_prompt":3,"tokens_completion":2,"total_cost":0.0001}}"#,
        )
        .unwrap();
        let message = reply.into_message();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.content, "hi there");
        assert_eq!(message.usage.and_then(|u| u.tokens_prompt), Some(3));
    }

    #[test]
    fn role_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
        assert!(serde_json::from_str::<Role>("\"system\"").is_err());
    }
}
