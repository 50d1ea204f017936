//! Client-side rendering and view-model logic for the AI chatbot UI.
//!
//! [`segment`] turns a chat message into ordered display segments (image,
//! markdown, fenced code, classified data). [`markdown`] and [`highlight`]
//! are the display collaborators, [`html`] glues them into fragments, and
//! [`session`] keeps the conversation view consistent while requests are in
//! flight.

pub mod analysis;
pub mod classify;
pub mod errors;
pub mod highlight;
pub mod html;
pub mod markdown;
pub mod models;
pub mod notice;
pub mod segment;
pub mod session;
pub mod stats;

pub use classify::{ContentClassifier, DataKind, MarkerClassifier, MarkerRule};
pub use errors::{RenderError, SessionError};
pub use highlight::{HighlightedCode, SyntaxHighlighter, Syntect};
pub use html::MessageHtml;
pub use markdown::{CommonMark, MarkdownFormatter};
pub use models::{Conversation, ConversationId, Message, Role, Usage};
pub use notice::{Notice, NoticeLevel};
pub use segment::{render, RenderConfig, Renderer, Segment, Segments};
pub use session::{ChatEntry, ChatSession, Outcome, PendingSend, Ticket};
