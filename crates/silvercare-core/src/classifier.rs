//! Keyword heuristics that label user text with sentiment and follow-up hints.
//!
//! All matching is case-insensitive substring search over fixed tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse emotional tone of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Concerned,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Concerned => "concerned",
        };
        f.write_str(label)
    }
}

/// Words indicating distress. Checked before [`POSITIVE_KEYWORDS`].
pub const CONCERN_KEYWORDS: [&str; 8] = ["아프", "힘들", "외로", "슬프", "걱정", "무서", "답답", "괴로"];

pub const POSITIVE_KEYWORDS: [&str; 7] = ["좋", "행복", "기쁘", "즐거", "고마", "사랑", "웃"];

/// Terms in an assistant reply that call for contacting someone.
pub const URGENCY_KEYWORDS: [&str; 5] = ["연락", "병원", "119", "응급", "도움"];

/// A topic group: any trigger adds every suggestion, in order.
#[derive(Debug, Clone, Copy)]
pub struct ActionGroup {
    pub name: &'static str,
    pub triggers: &'static [&'static str],
    pub suggestions: &'static [&'static str],
}

pub const ACTION_GROUPS: [ActionGroup; 3] = [
    ActionGroup {
        name: "illness",
        triggers: &["아프", "몸이"],
        suggestions: &["가족에게 연락하기", "병원 예약하기"],
    },
    ActionGroup {
        name: "loneliness",
        triggers: &["외로", "심심"],
        suggestions: &["가족과 통화하기", "산책하기", "이웃과 인사하기"],
    },
    ActionGroup {
        name: "medication",
        triggers: &["약", "복용"],
        suggestions: &["복용 기록 확인하기", "약국에 문의하기"],
    },
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Labels `text` as concerned, positive or neutral.
pub fn classify_sentiment(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();

    if contains_any(&lowered, &CONCERN_KEYWORDS) {
        return Sentiment::Concerned;
    }

    if contains_any(&lowered, &POSITIVE_KEYWORDS) {
        return Sentiment::Positive;
    }

    Sentiment::Neutral
}

/// Collects follow-up suggestions from every matching topic group.
pub fn suggest_actions(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    ACTION_GROUPS
        .iter()
        .filter(|group| contains_any(&lowered, group.triggers))
        .flat_map(|group| group.suggestions.iter().map(|s| s.to_string()))
        .collect()
}

/// True when an assistant reply mentions contacting family, a hospital or emergency services.
pub fn requires_action(reply: &str) -> bool {
    contains_any(reply, &URGENCY_KEYWORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concern_dominates_positive() {
        assert_eq!(classify_sentiment("고마워, 그런데 다리가 아프다"), Sentiment::Concerned);
    }

    #[test]
    fn test_positive_and_neutral() {
        assert_eq!(classify_sentiment("오늘 날씨가 좋네요"), Sentiment::Positive);
        assert_eq!(classify_sentiment("점심은 국수를 먹었어요"), Sentiment::Neutral);
        assert_eq!(classify_sentiment(""), Sentiment::Neutral);
    }

    #[test]
    fn test_every_input_gets_exactly_one_label() {
        for text in ["", "   ", "abc", "외로워", "행복해", "HELLO 웃음", "약 먹었어요"] {
            let label = classify_sentiment(text);
            assert!(matches!(
                label,
                Sentiment::Positive | Sentiment::Neutral | Sentiment::Concerned
            ));
        }
    }

    #[test]
    fn test_suggest_actions_unions_groups_in_order() {
        let actions = suggest_actions("몸이 안 좋고 외로워요");
        assert_eq!(
            actions,
            vec![
                "가족에게 연락하기",
                "병원 예약하기",
                "가족과 통화하기",
                "산책하기",
                "이웃과 인사하기",
            ]
        );
    }

    #[test]
    fn test_suggest_actions_medication_only() {
        assert_eq!(
            suggest_actions("혈압약 복용했어요"),
            vec!["복용 기록 확인하기", "약국에 문의하기"]
        );
        assert!(suggest_actions("안녕하세요").is_empty());
    }

    #[test]
    fn test_requires_action() {
        assert!(requires_action("가족에게 연락해보시겠어요?"));
        assert!(requires_action("바로 119에 전화하세요"));
        assert!(!requires_action("좋은 하루 보내세요"));
    }

    #[test]
    fn test_sentiment_serializes_lowercase() {
        let json = serde_json::to_string(&Sentiment::Concerned).unwrap();
        assert_eq!(json, "\"concerned\"");
        let parsed: Sentiment = serde_json::from_str("\"positive\"").unwrap();
        assert_eq!(parsed, Sentiment::Positive);
    }
}
