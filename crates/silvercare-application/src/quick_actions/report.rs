//! Figures for the simulated weekly health report.

use rand::Rng;

pub const STEP_GOAL: u32 = 8000;

const MOODS: [&str; 3] = ["좋음", "보통", "피곤"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepQuality {
    Good,
    NeedsImprovement,
}

impl SleepQuality {
    pub fn label(&self) -> &'static str {
        match self {
            SleepQuality::Good => "양호",
            SleepQuality::NeedsImprovement => "개선 필요",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyReport {
    pub average_heart_rate: u32,
    pub average_steps: u32,
    pub sleep_quality: SleepQuality,
    pub medication_compliance: u32,
    pub blood_pressure: String,
    pub weight: u32,
    pub mood: &'static str,
}

impl WeeklyReport {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let sleep_quality = if rng.gen_bool(0.4) {
            SleepQuality::Good
        } else {
            SleepQuality::NeedsImprovement
        };

        Self {
            average_heart_rate: rng.gen_range(72..87),
            average_steps: rng.gen_range(6000..8000),
            sleep_quality,
            medication_compliance: rng.gen_range(85..100),
            blood_pressure: format!("{}/{}", rng.gen_range(120..140), rng.gen_range(75..90)),
            weight: rng.gen_range(65..70),
            mood: MOODS[rng.gen_range(0..MOODS.len())],
        }
    }

    pub fn heart_rate_ok(&self) -> bool {
        self.average_heart_rate <= 85
    }

    /// Four categories worth 25 points when good and 15 otherwise.
    pub fn score(&self) -> u32 {
        let part = |good: bool| if good { 25 } else { 15 };
        part(self.heart_rate_ok())
            + part(self.average_steps >= 6000)
            + part(self.sleep_quality == SleepQuality::Good)
            + part(self.medication_compliance >= 90)
    }

    pub fn step_goal_percent(&self) -> u32 {
        (self.average_steps as f64 / (STEP_GOAL as f64 / 100.0)).round() as u32
    }

    pub fn suggestions(&self) -> Vec<&'static str> {
        let mut suggestions = Vec::new();
        if self.average_steps < STEP_GOAL {
            suggestions.push("일일 산책 시간 늘리기");
        }
        if self.sleep_quality == SleepQuality::NeedsImprovement {
            suggestions.push("규칙적인 수면 습관");
        }
        if self.medication_compliance < 90 {
            suggestions.push("복약 알림 설정");
        }
        suggestions
    }
}

pub fn score_grade(score: u32) -> &'static str {
    match score {
        80.. => "우수",
        60.. => "양호",
        _ => "주의",
    }
}

/// `6234` → `6,234`.
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
