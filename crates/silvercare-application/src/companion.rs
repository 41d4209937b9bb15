//! Chat turns that also feed the alert panel.
//!
//! The conversation store hands reply hints back to its caller instead of
//! posting alerts itself; this service is that caller.

use std::sync::Arc;

use silvercare_core::chat::{ConversationStore, SendOutcome};
use silvercare_core::notification::{Alert, NewAlert, NotificationStore};
use silvercare_core::profile::UserProfile;

pub const FOLLOW_UP_TITLE: &str = "⚠️ 확인이 필요해요";
pub const SUGGESTION_TITLE: &str = "💡 추천 활동";

pub struct CompanionService {
    conversation: Arc<ConversationStore>,
    notifications: Arc<NotificationStore>,
    profile: UserProfile,
}

impl CompanionService {
    pub fn new(
        conversation: Arc<ConversationStore>,
        notifications: Arc<NotificationStore>,
        profile: UserProfile,
    ) -> Self {
        Self {
            conversation,
            notifications,
            profile,
        }
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Sends one user turn and posts alerts for whatever the reply flagged.
    pub async fn send(&self, content: &str) -> SendOutcome {
        let outcome = self.conversation.send(content, &self.profile).await;

        if let SendOutcome::Replied {
            message,
            action_required,
            suggested_actions,
        } = &outcome
        {
            self.route(&message.content, *action_required, suggested_actions);
        }

        outcome
    }

    fn route(&self, reply: &str, action_required: bool, suggested_actions: &[String]) -> Vec<Alert> {
        let mut posted = Vec::new();

        if action_required {
            posted.push(self.notifications.add(NewAlert::warning(
                FOLLOW_UP_TITLE,
                reply.to_string(),
                true,
            )));
        }

        if !suggested_actions.is_empty() {
            let lines: Vec<String> = suggested_actions.iter().map(|a| format!("• {}", a)).collect();
            posted.push(
                self.notifications
                    .add(NewAlert::reminder(SUGGESTION_TITLE, lines.join("\n"))),
            );
        }

        if !posted.is_empty() {
            tracing::debug!("Routed {} alerts from chat reply", posted.len());
        }
        posted
    }
}
