//! Server-side half of a chat turn: validate, ask the model, post-process.

use async_trait::async_trait;
use std::sync::Arc;

use silvercare_core::chat::{ChatReply, ChatRequest, ChatService};
use silvercare_core::classifier::{Sentiment, classify_sentiment, requires_action, suggest_actions};
use silvercare_core::config::ProxyConfig;
use silvercare_core::error::{CareError, Result};

use crate::claude_api::{ClaudeApiClient, LanguageModel};
use crate::prompt::{build_system_prompt, build_turns};

pub const APOLOGY_REPLY: &str = "죄송합니다. 일시적인 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.";
pub const EMPTY_REPLY: &str = "죄송합니다. 응답을 생성할 수 없습니다.";

pub const MISSING_KEY_MESSAGE: &str = "Claude API key not configured";
pub const MISSING_MESSAGE: &str = "Message is required";

/// Forwards chat turns to a [`LanguageModel`].
///
/// Once a request passes validation the proxy never fails: provider errors
/// turn into [`APOLOGY_REPLY`].
#[derive(Clone)]
pub struct ChatProxy {
    model: Option<Arc<dyn LanguageModel>>,
}

impl ChatProxy {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model: Some(model) }
    }

    /// A proxy with no credential. Every request is rejected with a config error.
    pub fn unconfigured() -> Self {
        Self { model: None }
    }

    /// Builds a Claude-backed proxy when the config carries an API key.
    pub fn from_config(config: &ProxyConfig) -> Self {
        match config.api_key.as_deref().filter(|key| !key.is_empty()) {
            Some(key) => {
                let client =
                    ClaudeApiClient::new(key, config.model.clone()).with_max_tokens(config.max_tokens);
                tracing::info!("Chat proxy using model {}", client.model());
                Self::new(Arc::new(client))
            }
            None => {
                tracing::warn!("No Claude API key configured; chat proxy will reject requests");
                Self::unconfigured()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// The reply sent whenever the provider call fails.
    pub fn apology() -> ChatReply {
        ChatReply {
            response: APOLOGY_REPLY.to_string(),
            sentiment: Sentiment::Neutral,
            action_required: false,
            suggested_actions: Vec::new(),
        }
    }

    /// Answers one chat turn.
    ///
    /// # Errors
    ///
    /// - [`CareError::Config`] when no model is configured.
    /// - [`CareError::Validation`] when the message is empty.
    pub async fn reply(&self, request: &ChatRequest) -> Result<ChatReply> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| CareError::config(MISSING_KEY_MESSAGE))?;

        if request.message.is_empty() {
            return Err(CareError::validation(MISSING_MESSAGE));
        }

        let system = build_system_prompt(request.user_profile.as_ref());
        let turns = build_turns(&request.conversation_history, &request.message);

        match model.complete(&system, &turns).await {
            Ok(text) => {
                let response = text
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| EMPTY_REPLY.to_string());
                Ok(ChatReply {
                    sentiment: classify_sentiment(&request.message),
                    action_required: requires_action(&response),
                    suggested_actions: suggest_actions(&request.message),
                    response,
                })
            }
            Err(err) => {
                tracing::warn!("Claude API call failed: {}", err);
                Ok(Self::apology())
            }
        }
    }
}

#[async_trait]
impl ChatService for ChatProxy {
    async fn classify_and_reply(&self, request: ChatRequest) -> Result<ChatReply> {
        self.reply(&request).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use silvercare_core::chat::{HistoryTurn, MessageRole};
    use silvercare_core::profile::UserProfile;
    use std::sync::Mutex;

    /// Records every call and answers with a fixed result.
    pub(crate) struct ScriptedModel {
        pub(crate) answer: Result<Option<String>>,
        pub(crate) calls: Mutex<Vec<(String, Vec<HistoryTurn>)>>,
    }

    impl ScriptedModel {
        pub(crate) fn answering(text: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(Some(text.to_string())),
                calls: Mutex::new(Vec::new()),
            })
        }

        pub(crate) fn failing() -> Arc<Self> {
            Arc::new(Self {
                answer: Err(CareError::provider("Claude API error: 529 overloaded")),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(None),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, system: &str, turns: &[HistoryTurn]) -> Result<Option<String>> {
            self.calls
                .lock()
                .unwrap()
                .push((system.to_string(), turns.to_vec()));
            self.answer.clone()
        }
    }

    fn request(message: &str) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            conversation_history: Vec::new(),
            user_profile: None,
        }
    }

    #[tokio::test]
    async fn test_reply_classifies_user_message_and_reply() {
        let model = ScriptedModel::answering("가족분께 연락해 보시는 건 어떨까요?");
        let proxy = ChatProxy::new(model.clone());

        let reply = proxy.reply(&request("오늘 너무 외로워요")).await.unwrap();

        assert_eq!(reply.sentiment, Sentiment::Concerned);
        assert!(reply.action_required);
        assert_eq!(
            reply.suggested_actions,
            vec!["가족과 통화하기", "산책하기", "이웃과 인사하기"]
        );
        assert_eq!(model.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reply_sends_profile_prompt_and_turns() {
        let model = ScriptedModel::answering("네, 어르신.");
        let proxy = ChatProxy::new(model.clone());
        let mut req = request("점심 먹었어요");
        req.user_profile = Some(UserProfile::demo());
        req.conversation_history = vec![
            HistoryTurn {
                role: MessageRole::User,
                content: "안녕".to_string(),
            },
            HistoryTurn {
                role: MessageRole::Assistant,
                content: "안녕하세요".to_string(),
            },
        ];

        proxy.reply(&req).await.unwrap();

        let calls = model.calls.lock().unwrap();
        let (system, turns) = &calls[0];
        assert!(system.contains("- 이름: 김영희"));
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[2].content, "점심 먹었어요");
    }

    #[tokio::test]
    async fn test_provider_failure_becomes_apology() {
        let proxy = ChatProxy::new(ScriptedModel::failing());

        let reply = proxy.reply(&request("약을 먹었어요")).await.unwrap();

        assert_eq!(reply, ChatProxy::apology());
        assert!(reply.suggested_actions.is_empty());
    }

    #[tokio::test]
    async fn test_empty_model_reply_uses_placeholder() {
        let proxy = ChatProxy::new(ScriptedModel::empty());

        let reply = proxy.reply(&request("안녕하세요")).await.unwrap();

        assert_eq!(reply.response, EMPTY_REPLY);
        assert!(!reply.action_required);
    }

    #[tokio::test]
    async fn test_validation_and_config_errors() {
        let proxy = ChatProxy::new(ScriptedModel::answering("x"));
        let err = proxy.reply(&request("")).await.unwrap_err();
        assert!(matches!(err, CareError::Validation(_)));

        let unconfigured = ChatProxy::unconfigured();
        let err = unconfigured.reply(&request("안녕")).await.unwrap_err();
        assert!(matches!(err, CareError::Config(_)));
        assert!(!unconfigured.is_configured());
    }

    #[test]
    fn test_from_config_requires_non_empty_key() {
        let mut config = ProxyConfig::default();
        assert!(!ChatProxy::from_config(&config).is_configured());

        config.api_key = Some(String::new());
        assert!(!ChatProxy::from_config(&config).is_configured());

        config.api_key = Some("sk-test".to_string());
        assert!(ChatProxy::from_config(&config).is_configured());
    }
}
