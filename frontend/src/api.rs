use chatbot_render::models::{
    ChatReply, ChatRequest, Conversation, ConversationId, Counter, ErrorBody, HistoryEntry, Message,
    SilverAnalysis, StatusBody,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Same origin as the page; the dev host forwards `/api` to the backend.
const API_BASE: &str = "/api";

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    /// Carries the backend's own error text when it sent one.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// The chat endpoint may answer 200 with an `error` field instead of a reply.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChatAnswer {
    Failed(ErrorBody),
    Reply(ChatReply),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Reset,
}

impl CounterAction {
    fn path(&self) -> &'static str {
        match self {
            CounterAction::Increment => "increment",
            CounterAction::Decrement => "decrement",
            CounterAction::Reset => "reset",
        }
    }
}

async fn read<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    if !resp.ok() {
        return Err(server_error(resp).await);
    }
    resp.json::<T>().await.map_err(|e| ApiError::Parse(e.to_string()))
}

async fn server_error(resp: Response) -> ApiError {
    let status = resp.status();
    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP error! status: {status}"),
    };
    ApiError::Server { status, message }
}

fn network(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

/// Fetches the list of all conversations.
pub async fn fetch_conversations() -> Result<Vec<Conversation>, ApiError> {
    let resp = Request::get(&format!("{API_BASE}/conversations")).send().await.map_err(network)?;
    read(resp).await
}

pub async fn create_conversation() -> Result<Conversation, ApiError> {
    let resp = Request::post(&format!("{API_BASE}/conversations")).send().await.map_err(network)?;
    read(resp).await
}

pub async fn delete_conversation(id: &ConversationId) -> Result<(), ApiError> {
    let resp = Request::delete(&format!("{API_BASE}/conversations/{id}"))
        .send()
        .await
        .map_err(network)?;
    if !resp.ok() {
        return Err(server_error(resp).await);
    }
    Ok(())
}

/// Fetches all messages of a conversation, oldest first.
pub async fn fetch_chat_history(id: &ConversationId) -> Result<Vec<Message>, ApiError> {
    let resp = Request::get(&format!("{API_BASE}/chat_history/{id}"))
        .send()
        .await
        .map_err(network)?;
    let entries: Vec<HistoryEntry> = read(resp).await?;
    Ok(entries.into_iter().map(Message::from).collect())
}

/// Sends a user message and returns the assistant's reply.
pub async fn send_chat(request: &ChatRequest) -> Result<Message, ApiError> {
    let resp = Request::post(&format!("{API_BASE}/chat"))
        .json(request)
        .map_err(|e| ApiError::Serialize(e.to_string()))?
        .send()
        .await
        .map_err(network)?;
    let status = resp.status();
    match read::<ChatAnswer>(resp).await? {
        ChatAnswer::Reply(reply) => Ok(reply.into_message()),
        ChatAnswer::Failed(body) => Err(ApiError::Server { status, message: body.error }),
    }
}

pub async fn reset_chat_history() -> Result<(), ApiError> {
    let resp = Request::post(&format!("{API_BASE}/chat_history/reset"))
        .send()
        .await
        .map_err(network)?;
    let status = resp.status();
    let body: StatusBody = read(resp).await?;
    if body.is_success() {
        Ok(())
    } else {
        Err(ApiError::Server {
            status,
            message: body.message.unwrap_or_else(|| "Reset failed".to_string()),
        })
    }
}

pub async fn fetch_silver_analysis() -> Result<SilverAnalysis, ApiError> {
    let resp = Request::get(&format!("{API_BASE}/silver_analysis")).send().await.map_err(network)?;
    read(resp).await
}

pub async fn fetch_counter() -> Result<Counter, ApiError> {
    let resp = Request::get(&format!("{API_BASE}/counter")).send().await.map_err(network)?;
    read(resp).await
}

pub async fn update_counter(action: CounterAction) -> Result<Counter, ApiError> {
    let resp = Request::post(&format!("{API_BASE}/counter/{}", action.path()))
        .send()
        .await
        .map_err(network)?;
    read(resp).await
}
