//! The resident's daily medication schedule.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Medication {
    pub name: &'static str,
    /// Hour of day (local) the dose is due.
    pub hour: u32,
    pub dosage: &'static str,
    pub note: &'static str,
}

impl Medication {
    pub fn time_label(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    /// A dose counts as taken once its hour has started.
    pub fn is_taken_at(&self, hour: u32) -> bool {
        hour >= self.hour
    }
}

pub const DAILY_MEDICATIONS: [Medication; 3] = [
    Medication {
        name: "고혈압약 (암로디핀)",
        hour: 8,
        dosage: "5mg",
        note: "어지러움 주의",
    },
    Medication {
        name: "당뇨약 (메트포르민)",
        hour: 12,
        dosage: "500mg",
        note: "식사 후 복용",
    },
    Medication {
        name: "관절염약 (이부프로펜)",
        hour: 20,
        dosage: "200mg",
        note: "위장 보호제와 함께",
    },
];

/// Where the day's schedule stands at a given hour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationStatus {
    pub taken: Vec<Medication>,
    pub pending: Vec<Medication>,
}

impl MedicationStatus {
    pub fn at_hour(hour: u32) -> Self {
        let (taken, pending) = DAILY_MEDICATIONS
            .iter()
            .cloned()
            .partition(|m| m.is_taken_at(hour));
        Self { taken, pending }
    }

    /// Percentage of doses taken, rounded.
    pub fn compliance(&self) -> u32 {
        let total = self.taken.len() + self.pending.len();
        if total == 0 {
            return 100;
        }
        ((self.taken.len() as f64 / total as f64) * 100.0).round() as u32
    }

    /// `• name (08:00, 5mg)` per pending dose.
    pub fn pending_list(&self) -> String {
        self.pending
            .iter()
            .map(|m| format!("• {} ({}, {})", m.name, m.time_label(), m.dosage))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
