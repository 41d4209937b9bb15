//! Conversation store: message history plus the send-message protocol.

use std::sync::{Arc, Mutex, MutexGuard};

use super::model::{ConversationState, Message, MessageDraft, PersistedConversation};
use super::service::{ChatRequest, ChatService, HistoryTurn};
use crate::persistence::{SnapshotRepository, load_or_default, save_logged};
use crate::profile::UserProfile;
use crate::time::{Clock, generate_id};

const STORE: &str = "ConversationStore";

/// Number of prior messages sent as context with each turn.
///
/// The window is taken before the new user message is appended, so the
/// current turn travels only as `ChatRequest::message`, never in the history.
pub const HISTORY_WINDOW: usize = 10;

/// What happened to a `send` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Empty or whitespace-only input; nothing changed.
    Skipped,
    /// The assistant answered. The hints are handed back to the caller and not kept.
    Replied {
        message: Message,
        action_required: bool,
        suggested_actions: Vec<String>,
    },
    /// Transport failure; the user turn stays, `error` is set.
    Failed { error: String },
}

/// Owns the conversation history.
///
/// Every mutation runs to completion under one lock and persists the last
/// messages before releasing it. The only suspension point is the chat
/// request inside [`ConversationStore::send`], which runs without the lock.
pub struct ConversationStore {
    state: Mutex<ConversationState>,
    chat_service: Arc<dyn ChatService>,
    repository: Arc<dyn SnapshotRepository<PersistedConversation>>,
    clock: Arc<dyn Clock>,
}

impl ConversationStore {
    /// Creates an empty store without reading storage.
    pub fn new(
        chat_service: Arc<dyn ChatService>,
        repository: Arc<dyn SnapshotRepository<PersistedConversation>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Mutex::new(ConversationState::default()),
            chat_service,
            repository,
            clock,
        }
    }

    /// Creates a store rehydrated from the repository (empty on any fault).
    pub fn restore(
        chat_service: Arc<dyn ChatService>,
        repository: Arc<dyn SnapshotRepository<PersistedConversation>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = load_or_default(repository.as_ref(), STORE)
            .map(ConversationState::from_persisted)
            .unwrap_or_default();

        tracing::debug!("[{}] Rehydrated {} messages", STORE, state.messages.len());

        Self {
            state: Mutex::new(state),
            chat_service,
            repository,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, state: &ConversationState) {
        save_logged(self.repository.as_ref(), &state.to_persisted(), STORE);
    }

    fn stamp(&self, draft: MessageDraft) -> Message {
        Message {
            id: generate_id(),
            role: draft.role,
            content: draft.content,
            timestamp: self.clock.now(),
            sentiment: draft.sentiment,
        }
    }

    pub fn snapshot(&self) -> ConversationState {
        self.lock().clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Stamps `draft` with a fresh id and the current time and appends it.
    pub fn append_message(&self, draft: MessageDraft) -> Message {
        let message = self.stamp(draft);
        let mut state = self.lock();
        state.messages.push(message.clone());
        self.persist(&state);
        message
    }

    /// Sends one user turn and records the assistant's reply.
    ///
    /// Calling this again while a previous call is still loading races the
    /// in-flight request; callers must wait for `is_loading()` to clear.
    pub async fn send(&self, content: &str, profile: &UserProfile) -> SendOutcome {
        if content.trim().is_empty() {
            return SendOutcome::Skipped;
        }

        let request = {
            let mut state = self.lock();
            let skip = state.messages.len().saturating_sub(HISTORY_WINDOW);
            let conversation_history: Vec<HistoryTurn> =
                state.messages[skip..].iter().map(HistoryTurn::from).collect();

            let user_message = self.stamp(MessageDraft::user(content));
            state.messages.push(user_message);
            state.is_loading = true;
            state.error = None;
            self.persist(&state);

            ChatRequest {
                message: content.to_string(),
                conversation_history,
                user_profile: Some(profile.clone()),
            }
        };

        let mut loading = LoadingGuard::new(&self.state);
        let result = self.chat_service.classify_and_reply(request).await;

        let mut state = self.lock();
        state.is_loading = false;
        loading.disarm();

        match result {
            Ok(reply) => {
                let message = self.stamp(MessageDraft::assistant(
                    reply.response,
                    Some(reply.sentiment),
                ));
                state.messages.push(message.clone());
                self.persist(&state);

                tracing::debug!(
                    "[{}] Reply received (sentiment: {}, action required: {})",
                    STORE,
                    reply.sentiment,
                    reply.action_required
                );

                SendOutcome::Replied {
                    message,
                    action_required: reply.action_required,
                    suggested_actions: reply.suggested_actions,
                }
            }
            Err(e) => {
                let error = e.to_string();
                tracing::warn!("[{}] Send failed: {}", STORE, error);
                state.error = Some(error.clone());
                SendOutcome::Failed { error }
            }
        }
    }

    /// Empties the history and clears the error.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.messages.clear();
        state.error = None;
        self.persist(&state);
    }

    pub fn set_loading(&self, loading: bool) {
        self.lock().is_loading = loading;
    }

    pub fn set_error(&self, error: Option<String>) {
        self.lock().error = error;
    }
}

/// Clears `is_loading` if the send future is dropped mid-request.
struct LoadingGuard<'a> {
    state: &'a Mutex<ConversationState>,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a Mutex<ConversationState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .is_loading = false;
        }
    }
}
