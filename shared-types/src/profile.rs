use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unparsed experience or education item as located on the profile page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct RawEntry {
    pub title: String,
    pub company: String,
    pub duration: String, // Free text, e.g. "3 yrs 2 mos" or "Jan 2020 - Present"
    pub location: String,
    pub employment_type: String,
    pub description: String,
}

impl RawEntry {
    /// Every free-text field paired with its wire name.
    pub fn text_fields(&self) -> [(&'static str, &str); 6] {
        [
            ("title", self.title.as_str()),
            ("company", self.company.as_str()),
            ("duration", self.duration.as_str()),
            ("location", self.location.as_str()),
            ("employmentType", self.employment_type.as_str()),
            ("description", self.description.as_str()),
        ]
    }
}

/// Normalized candidate profile handed to the submission layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProfileRecord {
    pub name: String,
    pub email: String, // Empty when no address was resolved
    pub about: String,
    pub experience: Vec<RawEntry>,
    pub education: Vec<RawEntry>,
    pub skills: Vec<String>,
    pub years_experience: u32,
    pub full_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_uses_camel_case_on_the_wire() {
        let record = ProfileRecord {
            name: "Alice Smith".to_string(),
            years_experience: 5,
            full_text: "Alice Smith".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["yearsExperience"], 5);
        assert_eq!(json["fullText"], "Alice Smith");
        assert_eq!(json["email"], "");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record: ProfileRecord = serde_json::from_str(r#"{"name": "Bob"}"#).unwrap();
        assert_eq!(record.email, "");
        assert!(record.experience.is_empty());

        let entry: RawEntry =
            serde_json::from_str(r#"{"title": "Engineer", "employmentType": "Full-time"}"#)
                .unwrap();
        assert_eq!(entry.employment_type, "Full-time");
        assert_eq!(entry.duration, "");
    }
}
