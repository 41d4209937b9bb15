//! One-tap scenarios that play a scripted series of alerts.
//!
//! These are cosmetic: each call adds alerts to the feed on a fixed
//! schedule and never reports failure.

pub mod medication;
pub mod report;
pub mod sequence;

use std::sync::Arc;

use rand::thread_rng;
use silvercare_core::notification::{AlertMetadata, NewAlert, NotificationStore, Severity};
use silvercare_core::profile::{EmergencyContact, UserProfile};
use silvercare_core::telemetry::VitalsSnapshot;

pub use medication::{DAILY_MEDICATIONS, Medication, MedicationStatus};
pub use report::{SleepQuality, WeeklyReport};
pub use sequence::{AlertSequence, Step};

use report::{group_thousands, score_grade};

pub const DEFAULT_LOCATION: &str = "서울시 강남구 자택";

/// Relationship label that marks a contact as medical staff rather than family.
const MEDICAL_RELATIONSHIP: &str = "의료진";

fn fallback_family() -> Vec<EmergencyContact> {
    vec![
        EmergencyContact::new("김철수", "010-1234-5678", "아들"),
        EmergencyContact::new("박미영", "010-9876-5432", "딸"),
        EmergencyContact::new("이순자", "010-5555-1234", "며느리"),
    ]
}

/// Non-medical emergency contacts, or a built-in directory when there are none.
pub fn family_directory(profile: &UserProfile) -> Vec<EmergencyContact> {
    let family: Vec<EmergencyContact> = profile
        .emergency_contacts
        .iter()
        .filter(|c| c.relationship != MEDICAL_RELATIONSHIP)
        .cloned()
        .collect();

    if family.is_empty() {
        fallback_family()
    } else {
        family
    }
}

pub struct QuickActions {
    notifications: Arc<NotificationStore>,
    elder_name: String,
    location: String,
    family: Vec<EmergencyContact>,
}

impl QuickActions {
    pub fn new(notifications: Arc<NotificationStore>, profile: &UserProfile) -> Self {
        Self {
            notifications,
            elder_name: profile.name.clone(),
            location: DEFAULT_LOCATION.to_string(),
            family: family_directory(profile),
        }
    }

    pub fn family(&self) -> &[EmergencyContact] {
        &self.family
    }

    /// Raises an emergency. When `confirmed`, also simulates calling 119,
    /// family and the care team.
    pub fn emergency_call(&self, confirmed: bool, vitals: Option<VitalsSnapshot>) -> AlertSequence {
        tracing::info!("Emergency quick action (confirmed: {})", confirmed);

        let metadata = AlertMetadata {
            elder_name: Some(self.elder_name.clone()),
            location: Some(self.location.clone()),
            severity: Some(Severity::Critical),
            vitals,
        };
        let mut steps = vec![Step::now(NewAlert::emergency(
            "🚨 응급 상황 발생",
            "응급상황이 감지되었습니다. 즉시 대응 중입니다.",
            Some(metadata),
        ))];

        if confirmed {
            let notified = self
                .family
                .iter()
                .map(|c| format!("{}({})", c.name, c.relationship))
                .collect::<Vec<_>>()
                .join(", ");

            steps.extend([
                Step::now(NewAlert::warning(
                    "📞 119 신고 접수",
                    "119에 신고가 접수되었습니다. 구급차가 출동 중입니다.",
                    false,
                )),
                Step::after_millis(
                    2000,
                    NewAlert::info(
                        "👨‍👩‍👧‍👦 가족 연락 완료",
                        format!("{}에게 응급상황이 전달되었습니다.", notified),
                    ),
                ),
                Step::after_millis(
                    4000,
                    NewAlert::info(
                        "🏥 병원 연락 완료",
                        "담당 의료진에게 상황이 전달되어 응급실에서 대기 중입니다.",
                    ),
                ),
                Step::after_millis(
                    6000,
                    NewAlert::info(
                        "✅ 응급 대응 완료",
                        "모든 응급 연락이 완료되었습니다. 구급차 도착 예정시간: 약 5분",
                    ),
                ),
            ]);
        }

        sequence::play(&self.notifications, steps)
    }

    /// Simulates a call to the family member numbered `choice` (1-based).
    ///
    /// `None` means the caller backed out; nothing is added.
    pub fn family_call(&self, choice: Option<&str>) -> AlertSequence {
        let Some(choice) = choice else {
            return AlertSequence::empty();
        };

        let contact = choice
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| self.family.get(index));

        let Some(contact) = contact else {
            tracing::debug!("Invalid family call choice '{}'", choice);
            return sequence::play(
                &self.notifications,
                vec![Step::now(NewAlert::warning(
                    "❌ 잘못된 선택",
                    "올바른 번호를 선택해주세요.",
                    false,
                ))],
            );
        };

        let steps = vec![
            Step::now(NewAlert::info(
                "📞 전화 연결 중",
                format!(
                    "{}({})님에게 전화를 걸고 있습니다...",
                    contact.name, contact.relationship
                ),
            )),
            Step::after_millis(
                1500,
                NewAlert::info("🔔 연결음", "따르릉~ 따르릉~ 연결 중입니다..."),
            ),
            Step::after_millis(
                3000,
                NewAlert::info(
                    "✅ 통화 연결 완료",
                    format!(
                        "{}님과 통화가 연결되었습니다. \"안녕하세요, 어르신! 오늘 기분은 어떠세요?\"",
                        contact.name
                    ),
                ),
            ),
            Step::after_millis(
                8000,
                NewAlert::info(
                    "📱 통화 종료",
                    format!(
                        "{}님과의 즐거운 통화가 종료되었습니다. 통화시간: 5분 30초",
                        contact.name
                    ),
                ),
            ),
        ];

        sequence::play(&self.notifications, steps)
    }

    /// Checks the daily schedule at local `hour`. `take_now` answers the
    /// "take it now?" prompt shown when doses are pending.
    pub fn medication_check(&self, hour: u32, take_now: bool) -> AlertSequence {
        let status = MedicationStatus::at_hour(hour);

        let mut steps = vec![Step::now(NewAlert::info(
            "💊 복약 상태 확인 중",
            "오늘의 복약 일정을 확인하고 있습니다...",
        ))];

        match status.pending.first() {
            Some(next_dose) => {
                steps.push(Step::after_millis(
                    2000,
                    NewAlert::reminder(
                        "⏰ 복약 알림",
                        format!(
                            "{}개의 약을 복용해야 합니다:\n{}",
                            status.pending.len(),
                            status.pending_list()
                        ),
                    ),
                ));
                if take_now {
                    steps.push(Step::after_millis(
                        2000,
                        NewAlert::info(
                            "✅ 복약 완료",
                            format!(
                                "{}을 복용하셨습니다. 다음 복용 시간을 잊지 마세요!",
                                next_dose.name
                            ),
                        ),
                    ));
                    steps.push(Step::after_millis(
                        4000,
                        NewAlert::info(
                            "📋 복약 기록 저장",
                            "복약 기록이 건강 일지에 자동으로 저장되었습니다.",
                        ),
                    ));
                }
            }
            None => steps.push(Step::after_millis(
                2000,
                NewAlert::info(
                    "🎉 복약 완료",
                    format!(
                        "오늘의 모든 약을 정시에 복용하셨습니다!\n복용 완료: {}개",
                        status.taken.len()
                    ),
                ),
            )),
        }

        let compliance = status.compliance();
        steps.push(Step::after_millis(
            6000,
            NewAlert::info(
                "📊 이번 주 복약률",
                format!(
                    "복약 준수율: {}% (평균보다 {})",
                    compliance,
                    if compliance > 85 { "우수" } else { "개선 필요" }
                ),
            ),
        ));

        sequence::play(&self.notifications, steps)
    }

    /// Plays a randomly generated weekly report.
    pub fn health_report(&self) -> AlertSequence {
        self.health_report_for(WeeklyReport::random(&mut thread_rng()))
    }

    pub fn health_report_for(&self, report: WeeklyReport) -> AlertSequence {
        let score = report.score();
        let suggestions = report.suggestions();

        let advice = if suggestions.is_empty() {
            NewAlert::info(
                "🎉 훌륭한 건강 관리",
                "모든 건강 지표가 우수합니다! 현재 생활 패턴을 유지하세요.",
            )
        } else {
            NewAlert::reminder(
                "💡 건강 개선 제안",
                format!("이번 주 개선 포인트:\n• {}", suggestions.join("\n• ")),
            )
        };

        let steps = vec![
            Step::now(NewAlert::info(
                "📊 건강 리포트 생성 중",
                "최근 7일간의 건강 데이터를 분석하고 있습니다...",
            )),
            Step::after_millis(
                3000,
                NewAlert::info(
                    "📈 주간 건강 리포트",
                    format!("종합 건강점수: {}/100점 ({})", score, score_grade(score)),
                ),
            ),
            Step::after_millis(
                5000,
                NewAlert::info(
                    "❤️ 심혈관 건강",
                    format!(
                        "평균 심박수: {}bpm, 혈압: {}mmHg ({})",
                        report.average_heart_rate,
                        report.blood_pressure,
                        if report.heart_rate_ok() { "정상" } else { "주의" }
                    ),
                ),
            ),
            Step::after_millis(
                7000,
                NewAlert::info(
                    "🚶‍♂️ 활동량 분석",
                    format!(
                        "일평균 걸음수: {}걸음 (목표 8,000걸음의 {}%)",
                        group_thousands(report.average_steps),
                        report.step_goal_percent()
                    ),
                ),
            ),
            Step::after_millis(
                9000,
                NewAlert::info(
                    "😴 수면 & 복약",
                    format!(
                        "수면 질: {}, 복약률: {}%, 기분: {}",
                        report.sleep_quality.label(),
                        report.medication_compliance,
                        report.mood
                    ),
                ),
            ),
            Step::after_millis(11000, advice),
            Step::after_millis(
                13000,
                NewAlert::info(
                    "📄 리포트 저장 완료",
                    "상세 건강 리포트가 PDF로 저장되었습니다. 가족과 의료진에게 공유 가능합니다.",
                ),
            ),
        ];

        sequence::play(&self.notifications, steps)
    }
}
