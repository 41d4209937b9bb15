//! The person the companion is looking after.

use serde::{Deserialize, Serialize};

/// Someone to call when something goes wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
    pub relationship: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_primary: bool,
}

impl EmergencyContact {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            relationship: relationship.into(),
            is_primary: false,
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }
}

/// Profile sent along with every chat turn so the model can personalise replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medical_conditions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emergency_contacts: Vec<EmergencyContact>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            id: None,
            name: name.into(),
            age,
            medical_conditions: Vec::new(),
            emergency_contacts: Vec::new(),
        }
    }

    /// The demo resident used when no profile is configured.
    pub fn demo() -> Self {
        Self {
            id: Some("demo-user-001".to_string()),
            name: "김영희".to_string(),
            age: 73,
            medical_conditions: vec![
                "고혈압".to_string(),
                "당뇨병".to_string(),
                "관절염".to_string(),
            ],
            emergency_contacts: vec![
                EmergencyContact::new("김철수", "010-1234-5678", "아들").primary(),
                EmergencyContact::new("박미영", "010-9876-5432", "딸"),
                EmergencyContact::new("동네의원", "02-123-4567", "의료진"),
            ],
        }
    }

    pub fn primary_contact(&self) -> Option<&EmergencyContact> {
        self.emergency_contacts
            .iter()
            .find(|c| c.is_primary)
            .or_else(|| self.emergency_contacts.first())
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_profile() {
        let profile = UserProfile::demo();
        assert_eq!(profile.name, "김영희");
        assert_eq!(profile.age, 73);
        assert_eq!(profile.emergency_contacts.len(), 3);
        assert_eq!(profile.primary_contact().unwrap().name, "김철수");
    }

    #[test]
    fn test_profile_wire_format_is_camel_case() {
        let json = serde_json::to_value(UserProfile::demo()).unwrap();
        assert!(json.get("medicalConditions").is_some());
        assert_eq!(json["emergencyContacts"][0]["isPrimary"], true);
        assert!(json["emergencyContacts"][1].get("isPrimary").is_none());
    }

    #[test]
    fn test_minimal_profile_deserializes() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"name":"이순자","age":80}"#).unwrap();
        assert!(profile.medical_conditions.is_empty());
        assert!(profile.primary_contact().is_none());
    }
}
