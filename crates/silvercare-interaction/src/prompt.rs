//! System prompt and message window for the companion model.

use silvercare_core::chat::{HistoryTurn, MessageRole};
use silvercare_core::profile::UserProfile;

/// Number of prior turns forwarded to the provider.
pub const PROVIDER_HISTORY_WINDOW: usize = 10;

pub const ELDERCARE_SYSTEM_PROMPT: &str = "당신은 \"실버메이트\"라는 이름의 한국어 AI 케어봇입니다.
독거노인을 돌보는 따뜻하고 친근한 말투로 대화해주세요.

핵심 원칙:
- 항상 존댓말을 사용하며 \"어르신\"이라고 호칭
- 건강, 안전, 정서적 케어에 중점을 둠
- 간단하고 이해하기 쉬운 문장으로 대화
- 필요시 가족이나 의료진 연락을 제안
- 응급상황 감지 시 즉시 알림 안내

응답 시 다음 사항을 고려하세요:
1. 사용자의 감정 상태를 파악하고 적절히 응답
2. 건강 관련 우려사항이 있으면 전문가 상담 권유
3. 일상 대화를 통해 정서적 지지 제공
4. 규칙적인 생활 습관 유지를 격려

응답은 자연스럽고 따뜻하게 해주세요.";

/// The base prompt followed by whatever the profile tells us about the resident.
pub fn build_system_prompt(profile: Option<&UserProfile>) -> String {
    let mut prompt = ELDERCARE_SYSTEM_PROMPT.to_string();

    let Some(profile) = profile else {
        return prompt;
    };

    prompt.push_str(&format!(
        "\n\n사용자 정보:\n- 이름: {}\n- 나이: {}세",
        profile.name, profile.age
    ));

    if !profile.medical_conditions.is_empty() {
        prompt.push_str(&format!(
            "\n- 건강 상태: {}",
            profile.medical_conditions.join(", ")
        ));
    }

    if !profile.emergency_contacts.is_empty() {
        let contacts: Vec<String> = profile
            .emergency_contacts
            .iter()
            .map(|c| format!("{}({})", c.name, c.relationship))
            .collect();
        prompt.push_str(&format!("\n- 응급연락처: {}", contacts.join(", ")));
    }

    prompt
}

/// Last [`PROVIDER_HISTORY_WINDOW`] turns plus the new user message.
///
/// Leading assistant turns are dropped because the provider expects the
/// conversation to open with the user.
pub fn build_turns(history: &[HistoryTurn], message: &str) -> Vec<HistoryTurn> {
    let skip = history.len().saturating_sub(PROVIDER_HISTORY_WINDOW);
    let mut turns: Vec<HistoryTurn> = history[skip..]
        .iter()
        .skip_while(|t| t.role == MessageRole::Assistant)
        .cloned()
        .collect();

    turns.push(HistoryTurn {
        role: MessageRole::User,
        content: message.to_string(),
    });
    turns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: MessageRole, content: &str) -> HistoryTurn {
        HistoryTurn {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_prompt_without_profile_is_base() {
        assert_eq!(build_system_prompt(None), ELDERCARE_SYSTEM_PROMPT);
    }

    #[test]
    fn test_prompt_includes_profile_details() {
        let prompt = build_system_prompt(Some(&UserProfile::demo()));

        assert!(prompt.starts_with(ELDERCARE_SYSTEM_PROMPT));
        assert!(prompt.contains("- 이름: 김영희"));
        assert!(prompt.contains("- 나이: 73세"));
        assert!(prompt.contains("- 건강 상태: 고혈압, 당뇨병, 관절염"));
        assert!(prompt.contains("- 응급연락처: 김철수(아들), 박미영(딸), 동네의원(의료진)"));
    }

    #[test]
    fn test_prompt_skips_empty_sections() {
        let prompt = build_system_prompt(Some(&UserProfile::new("이순자", 80)));
        assert!(prompt.contains("- 나이: 80세"));
        assert!(!prompt.contains("건강 상태"));
        assert!(!prompt.contains("응급연락처"));
    }

    #[test]
    fn test_turns_window_and_new_message() {
        let history: Vec<HistoryTurn> = (0..14)
            .map(|n| {
                let role = if n % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                };
                turn(role, &format!("turn {}", n))
            })
            .collect();

        let turns = build_turns(&history, "새 메시지");

        assert_eq!(turns.len(), PROVIDER_HISTORY_WINDOW + 1);
        assert_eq!(turns[0].content, "turn 4");
        assert_eq!(turns.last().unwrap().content, "새 메시지");
        assert_eq!(turns.last().unwrap().role, MessageRole::User);
    }

    #[test]
    fn test_turns_drop_leading_assistant() {
        let history = vec![
            turn(MessageRole::Assistant, "안녕하세요 어르신"),
            turn(MessageRole::User, "반가워요"),
            turn(MessageRole::Assistant, "오늘 기분은 어떠세요?"),
        ];

        let turns = build_turns(&history, "좋아요");

        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, MessageRole::User);
    }
}
