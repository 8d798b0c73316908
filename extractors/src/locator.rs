use serde::{Deserialize, Serialize};
use shared_types::{ProfileError, RawEntry, SectionContent, SectionKind, SectionLocator};

use crate::sanitizer::SECTION_HEADERS;

/// Sections located ahead of time by the page-side collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticSections {
    pub about: String,
    pub experience: Vec<RawEntry>,
    pub education: Vec<RawEntry>,
    pub skills: Vec<String>,
}

impl StaticSections {
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl SectionLocator for StaticSections {
    fn locate(&self, kind: SectionKind) -> Option<SectionContent> {
        match kind {
            SectionKind::About if !self.about.trim().is_empty() => {
                Some(SectionContent::Text(self.about.clone()))
            }
            SectionKind::Experience if !self.experience.is_empty() => {
                Some(SectionContent::Entries(self.experience.clone()))
            }
            SectionKind::Education if !self.education.is_empty() => {
                Some(SectionContent::Entries(self.education.clone()))
            }
            SectionKind::Skills if !self.skills.is_empty() => {
                Some(SectionContent::Items(self.skills.clone()))
            }
            _ => None,
        }
    }
}

/// Finds narrative sections in flattened page text by their heading lines.
///
/// Flat text carries no entry structure, so experience and education are
/// always absent here.
#[derive(Debug, Clone)]
pub struct TextSectionLocator<'a> {
    text: &'a str,
}

impl<'a> TextSectionLocator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Non-empty lines between `heading` and the next section heading
    fn block(&self, heading: &str) -> Option<Vec<&'a str>> {
        let mut lines = self.text.lines().map(str::trim);
        lines.by_ref().find(|l| l.eq_ignore_ascii_case(heading))?;

        let block: Vec<&str> = lines
            .take_while(|l| !is_heading(l))
            .filter(|l| !l.is_empty())
            .collect();

        if block.is_empty() {
            None
        } else {
            Some(block)
        }
    }
}

impl SectionLocator for TextSectionLocator<'_> {
    fn locate(&self, kind: SectionKind) -> Option<SectionContent> {
        match kind {
            SectionKind::About => self
                .block("About")
                .map(|lines| SectionContent::Text(lines.join("\n"))),
            SectionKind::Skills => self.block("Skills").map(|lines| {
                SectionContent::Items(
                    lines
                        .into_iter()
                        .filter(|l| !l.to_lowercase().starts_with("show all"))
                        .map(str::to_string)
                        .collect(),
                )
            }),
            SectionKind::Experience | SectionKind::Education => None,
        }
    }
}

fn is_heading(line: &str) -> bool {
    SECTION_HEADERS.iter().any(|h| line.eq_ignore_ascii_case(h))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "Alice Smith\nStaff Engineer\n\nAbout\nI design payment systems\nand mentor engineers.\n\nExperience\nStaff Engineer\nAcme Corp\nSkills\nRust\nPostgreSQL\nShow all 12 skills\nEducation\nMIT";

    #[test]
    fn test_about_block_stops_at_next_heading() {
        let locator = TextSectionLocator::new(PAGE);
        assert_eq!(
            locator.text(SectionKind::About),
            "I design payment systems\nand mentor engineers."
        );
    }

    #[test]
    fn test_skills_are_items() {
        let locator = TextSectionLocator::new(PAGE);
        assert_eq!(locator.items(SectionKind::Skills), vec!["Rust", "PostgreSQL"]);
        assert!(locator.locate(SectionKind::Experience).is_none());
    }

    #[test]
    fn test_missing_heading_is_absent() {
        let locator = TextSectionLocator::new("Alice Smith\nExperience\nAcme");
        assert!(locator.locate(SectionKind::About).is_none());
        assert_eq!(locator.text(SectionKind::About), "");
    }

    #[test]
    fn test_static_sections_from_json() {
        let sections = StaticSections::from_json(
            r#"{
                "about": "",
                "experience": [{"title": "Engineer", "company": "Acme Corp", "duration": "2 yrs"}],
                "skills": ["Rust"]
            }"#,
        )
        .unwrap();

        assert!(sections.locate(SectionKind::About).is_none());
        assert!(sections.locate(SectionKind::Education).is_none());
        assert_eq!(sections.entries(SectionKind::Experience)[0].company, "Acme Corp");
        assert_eq!(sections.items(SectionKind::Skills), vec!["Rust"]);
    }

    #[test]
    fn test_bad_json_is_a_parse_error() {
        let err = StaticSections::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ProfileError::ParseError(_)));
    }
}
