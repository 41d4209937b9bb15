//! Conversation history and the send-message protocol.

pub mod model;
pub mod service;
pub mod store;

pub use model::{
    ConversationState, Message, MessageDraft, MessageRole, PERSISTED_MESSAGE_LIMIT,
    PersistedConversation,
};
pub use service::{ChatReply, ChatRequest, ChatService, HistoryTurn};
pub use store::{ConversationStore, HISTORY_WINDOW, SendOutcome};
